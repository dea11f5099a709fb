use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{self, AdminAction, Session, StaffSession, VolunteerSession};
use crate::db::models::{
    Event, EventFundraising, EventMetrics, EventStatus, EventUpdate, Feedback,
};
use crate::db::{self, RegisterOutcome, TransitionOutcome};
use crate::error::AppError;
use crate::feed::FeedSnapshot;
use crate::AppState;

pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let events = db::list_events(&state.db).await?;
    Ok(Json(json!({ "events": events })))
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: String, // RFC3339
    pub location: String,
    pub fundraising_goal: Option<f64>,
}

pub async fn create_event(
    State(state): State<AppState>,
    staff: StaffSession,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ManageEvents)?;

    if req.title.trim().is_empty() || req.location.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and location are required".to_string(),
        ));
    }
    let date = DateTime::parse_from_rfc3339(&req.date)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| AppError::Validation("Invalid event date".to_string()))?;

    let event = Event {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: req.description.trim().to_string(),
        date,
        location: req.location.trim().to_string(),
        status: EventStatus::Upcoming,
        metrics: None,
        fundraising: req.fundraising_goal.map(|goal| EventFundraising {
            goal: Some(goal),
            raised: 0.0,
        }),
    };
    db::add_event(&state.db, &event).await?;

    db::log_audit(
        &state.db,
        "EVENT_CREATED",
        &format!("New event created: {}", event.title),
        &staff.username,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": event.id })),
    ))
}

async fn transition(
    state: &AppState,
    staff: &StaffSession,
    id: &str,
    next: EventStatus,
    audit_action: &str,
) -> Result<(), AppError> {
    auth::require(staff, AdminAction::ManageEvents)?;

    match db::set_event_status(&state.db, id, next).await? {
        TransitionOutcome::Applied => {}
        TransitionOutcome::Invalid(current) => {
            return Err(AppError::Conflict(format!(
                "Cannot move event from {} to {}",
                current.as_str(),
                next.as_str()
            )))
        }
        TransitionOutcome::NotFound => return Err(AppError::NotFound("Event")),
    }

    db::log_audit(
        &state.db,
        audit_action,
        &format!("Event {} moved to {}", id, next.as_str()),
        &staff.username,
    )
    .await?;
    Ok(())
}

pub async fn start_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
    staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    transition(&state, &staff, &id, EventStatus::InProgress, "EVENT_STARTED").await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn end_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
    staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    transition(&state, &staff, &id, EventStatus::Completed, "EVENT_ENDED").await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn cancel_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
    staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    transition(&state, &staff, &id, EventStatus::Cancelled, "EVENT_CANCELLED").await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct MetricsRequest {
    pub people_fed: i64,
    pub cost_burnt: f64,
    /// Comma-separated partner list, parsed fresh on every call.
    pub partners: String,
}

pub async fn update_metrics(
    Path(id): Path<String>,
    State(state): State<AppState>,
    staff: StaffSession,
    Json(req): Json<MetricsRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ManageEvents)?;

    let metrics = EventMetrics {
        people_fed: req.people_fed,
        cost_burnt: req.cost_burnt,
        partners: req
            .partners
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
    };

    if !db::update_event_metrics(&state.db, &id, &metrics).await? {
        return Err(AppError::NotFound("Event"));
    }

    db::log_audit(
        &state.db,
        "EVENT_METRICS_UPDATED",
        &format!("Metrics updated for event {}", id),
        &staff.username,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}

/// Public feed snapshot polled by the live-feed client.
pub async fn list_updates(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let event = db::find_event(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Event"))?;
    let updates = db::list_event_updates(&state.db, &id).await?;
    Ok(Json(FeedSnapshot {
        live: event.status == EventStatus::InProgress,
        updates,
    }))
}

#[derive(Deserialize)]
pub struct PostUpdateRequest {
    pub content: String,
    pub image_url: Option<String>,
}

pub async fn post_update(
    Path(id): Path<String>,
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Update content is required".to_string()));
    }

    let event = db::find_event(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Event"))?;
    if event.status != EventStatus::InProgress {
        return Err(AppError::Conflict("Event is not live".to_string()));
    }

    let (author_id, author_name, audited_by) = match &session {
        Session::Staff(staff) => {
            auth::require(staff, AdminAction::PostUpdates)?;
            (staff.id.clone(), staff.username.clone(), Some(staff.username.clone()))
        }
        Session::Volunteer(VolunteerSession(volunteer)) => {
            if !volunteer.registered_events.iter().any(|e| e == &id) {
                return Err(AppError::Forbidden(
                    "Not registered for this event".to_string(),
                ));
            }
            (volunteer.id.clone(), volunteer.name.clone(), None)
        }
    };

    let update = EventUpdate {
        id: Uuid::new_v4().to_string(),
        event_id: id.clone(),
        content: req.content.trim().to_string(),
        author_id,
        author_name,
        timestamp: Utc::now(),
        image_url: req.image_url,
    };
    db::add_event_update(&state.db, &update).await?;

    if let Some(admin) = audited_by {
        db::log_audit(
            &state.db,
            "EVENT_UPDATE_POSTED",
            &format!("Update posted to event {}", id),
            &admin,
        )
        .await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": update.id })),
    ))
}

pub async fn register(
    Path(id): Path<String>,
    State(state): State<AppState>,
    VolunteerSession(volunteer): VolunteerSession,
) -> Result<impl IntoResponse, AppError> {
    if db::find_event(&state.db, &id).await?.is_none() {
        return Err(AppError::NotFound("Event"));
    }

    match db::register_volunteer_for_event(&state.db, &volunteer.id, &id).await? {
        RegisterOutcome::Registered => Ok(Json(json!({ "success": true }))),
        RegisterOutcome::AlreadyRegistered => {
            Err(AppError::Conflict("Already registered".to_string()))
        }
        RegisterOutcome::NotFound => Err(AppError::NotFound("Volunteer")),
    }
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub rating: i64,
    pub comment: String,
}

pub async fn submit_feedback(
    Path(id): Path<String>,
    State(state): State<AppState>,
    VolunteerSession(volunteer): VolunteerSession,
    Json(req): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    if db::find_event(&state.db, &id).await?.is_none() {
        return Err(AppError::NotFound("Event"));
    }

    let feedback = Feedback {
        id: Uuid::new_v4().to_string(),
        event_id: id,
        volunteer_id: volunteer.id,
        volunteer_name: volunteer.name,
        rating: req.rating,
        comment: req.comment.trim().to_string(),
        timestamp: Utc::now(),
    };
    db::add_feedback(&state.db, &feedback).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": feedback.id })),
    ))
}

pub async fn list_feedback(
    Path(id): Path<String>,
    State(state): State<AppState>,
    staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ViewFeedback)?;
    let feedback = db::list_feedback_for_event(&state.db, &id).await?;
    Ok(Json(json!({ "feedback": feedback })))
}
