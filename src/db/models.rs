use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolunteerStatus {
    Pending,
    Approved,
    Rejected,
}

impl VolunteerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolunteerStatus::Pending => "PENDING",
            VolunteerStatus::Approved => "APPROVED",
            VolunteerStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(VolunteerStatus::Pending),
            "APPROVED" => Some(VolunteerStatus::Approved),
            "REJECTED" => Some(VolunteerStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Upcoming,
    InProgress,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "UPCOMING",
            EventStatus::InProgress => "IN_PROGRESS",
            EventStatus::Completed => "COMPLETED",
            EventStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UPCOMING" => Some(EventStatus::Upcoming),
            "IN_PROGRESS" => Some(EventStatus::InProgress),
            "COMPLETED" => Some(EventStatus::Completed),
            "CANCELLED" => Some(EventStatus::Cancelled),
            _ => None,
        }
    }

    /// Valid transitions: UPCOMING -> IN_PROGRESS -> COMPLETED, with
    /// CANCELLED reachable from either pre-completion state.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Upcoming, EventStatus::InProgress)
                | (EventStatus::InProgress, EventStatus::Completed)
                | (EventStatus::Upcoming, EventStatus::Cancelled)
                | (EventStatus::InProgress, EventStatus::Cancelled)
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    SuperAdmin,
    Staff,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::SuperAdmin => "SUPER_ADMIN",
            StaffRole::Staff => "STAFF",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUPER_ADMIN" => Some(StaffRole::SuperAdmin),
            "STAFF" => Some(StaffRole::Staff),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub rating: i64,
    pub comment: String,
    pub date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Volunteer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub availability: String,
    pub status: VolunteerStatus,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Vec<Review>,
    pub joined_date: DateTime<Utc>,
    pub registered_events: Vec<String>,
    pub points: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventMetrics {
    pub people_fed: i64,
    pub cost_burnt: f64,
    pub partners: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventFundraising {
    /// Absent when donations arrived without a configured campaign target.
    pub goal: Option<f64>,
    pub raised: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub status: EventStatus,
    pub metrics: Option<EventMetrics>,
    pub fundraising: Option<EventFundraising>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventUpdate {
    pub id: String,
    pub event_id: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub timestamp: DateTime<Utc>,
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Donation {
    pub id: String,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub campaign_id: Option<String>,
    pub receipt_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub author: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuditLog {
    pub id: String,
    pub action: String,
    pub details: String,
    pub admin_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Staff {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: StaffRole,
    pub permissions: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Feedback {
    pub id: String,
    pub event_id: String,
    pub volunteer_id: String,
    pub volunteer_name: String,
    pub rating: i64,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}
