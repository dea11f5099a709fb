use anyhow::anyhow;
use chrono::{Duration as ChronoDuration, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use uuid::Uuid;

pub mod models;

use models::{
    Announcement, AuditLog, Donation, Event, EventFundraising, EventMetrics, EventStatus,
    EventUpdate, Feedback, Review, Staff, StaffRole, Volunteer, VolunteerStatus,
};

pub type DbPool = Pool<SqliteConnectionManager>;

pub async fn init_pool(path: &str) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(10)
        .connection_timeout(std::time::Duration::from_secs(30))
        .build(manager)
        .map_err(|e| anyhow!("Failed to create DB pool: {}", e))?;

    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS volunteers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            skills TEXT NOT NULL DEFAULT '[]',
            availability TEXT NOT NULL,
            status TEXT NOT NULL,
            password_hash TEXT,
            avatar_url TEXT,
            rating REAL,
            reviews TEXT NOT NULL DEFAULT '[]',
            joined_date TEXT NOT NULL,
            registered_events TEXT NOT NULL DEFAULT '[]',
            points INTEGER NOT NULL DEFAULT 0
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_volunteers_email ON volunteers(email);

        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            location TEXT NOT NULL,
            status TEXT NOT NULL,
            metrics TEXT,
            fund_goal REAL,
            fund_raised REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS event_updates (
            id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL,
            content TEXT NOT NULL,
            author_id TEXT NOT NULL,
            author_name TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            image_url TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_event_updates_event ON event_updates(event_id);

        CREATE TABLE IF NOT EXISTS donations (
            id TEXT PRIMARY KEY,
            donor_name TEXT NOT NULL,
            donor_email TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            campaign_id TEXT,
            receipt_id TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS announcements (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            date TEXT NOT NULL,
            author TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS audit_logs (
            id TEXT PRIMARY KEY,
            action TEXT NOT NULL,
            details TEXT NOT NULL,
            admin_id TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS staff (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL,
            permissions TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS feedback (
            id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL,
            volunteer_id TEXT NOT NULL,
            volunteer_name TEXT NOT NULL,
            rating INTEGER NOT NULL,
            comment TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// One-time seed of the built-in sample records. Only fires when the
/// volunteers table is empty; an existing dataset is never overwritten.
pub async fn seed_if_empty(pool: &DbPool) -> anyhow::Result<bool> {
    let existing: i64 = {
        let conn = pool.get()?;
        conn.query_row("SELECT COUNT(*) FROM volunteers", [], |r| r.get(0))?
    };
    if existing > 0 {
        return Ok(false);
    }

    let now = Utc::now();
    let password_hash = crate::auth::hash_password("password123")?;

    let alice = Volunteer {
        id: Uuid::new_v4().to_string(),
        name: "Alice Johnson".to_string(),
        email: "alice@example.com".to_string(),
        phone: "123-456-7890".to_string(),
        skills: vec!["Teaching".to_string(), "First Aid".to_string()],
        availability: "Weekends".to_string(),
        status: VolunteerStatus::Approved,
        password_hash: Some(password_hash.clone()),
        avatar_url: None,
        rating: Some(4.5),
        reviews: vec![
            Review {
                id: Uuid::new_v4().to_string(),
                author: "Community Center".to_string(),
                rating: 5,
                comment: "Alice was amazing! Very helpful and punctual.".to_string(),
                date: now - ChronoDuration::days(10),
            },
            Review {
                id: Uuid::new_v4().to_string(),
                author: "John Doe".to_string(),
                rating: 4,
                comment: "Great work ethic.".to_string(),
                date: now - ChronoDuration::days(5),
            },
        ],
        joined_date: now,
        registered_events: Vec::new(),
        points: 0,
    };
    let bob = Volunteer {
        id: Uuid::new_v4().to_string(),
        name: "Bob Smith".to_string(),
        email: "bob@example.com".to_string(),
        phone: "987-654-3210".to_string(),
        skills: vec!["Driving".to_string(), "Logistics".to_string()],
        availability: "Weekdays".to_string(),
        status: VolunteerStatus::Pending,
        password_hash: Some(password_hash),
        avatar_url: None,
        rating: None,
        reviews: Vec::new(),
        joined_date: now,
        registered_events: Vec::new(),
        points: 0,
    };
    add_volunteer(pool, &alice).await?;
    add_volunteer(pool, &bob).await?;

    add_event(
        pool,
        &Event {
            id: Uuid::new_v4().to_string(),
            title: "Community Clean-up Drive".to_string(),
            description: "Join us to clean up the local park and plant new trees.".to_string(),
            date: now + ChronoDuration::days(7),
            location: "Central Park".to_string(),
            status: EventStatus::Upcoming,
            metrics: None,
            fundraising: None,
        },
    )
    .await?;
    add_event(
        pool,
        &Event {
            id: Uuid::new_v4().to_string(),
            title: "Food Distribution Camp".to_string(),
            description: "Distributing food packets to underprivileged families.".to_string(),
            date: now - ChronoDuration::days(2),
            location: "Community Center".to_string(),
            status: EventStatus::Completed,
            metrics: None,
            fundraising: None,
        },
    )
    .await?;

    add_donation(
        pool,
        &Donation {
            id: Uuid::new_v4().to_string(),
            donor_name: "John Doe".to_string(),
            donor_email: "john@example.com".to_string(),
            amount: 5000.0,
            date: now,
            campaign_id: None,
            receipt_id: "RCPT-1001".to_string(),
        },
    )
    .await?;
    add_donation(
        pool,
        &Donation {
            id: Uuid::new_v4().to_string(),
            donor_name: "Jane Smith".to_string(),
            donor_email: "jane@example.com".to_string(),
            amount: 2500.0,
            date: now - ChronoDuration::days(1),
            campaign_id: None,
            receipt_id: "RCPT-1002".to_string(),
        },
    )
    .await?;

    add_announcement(
        pool,
        &Announcement {
            id: Uuid::new_v4().to_string(),
            title: "Winter Donation Drive Started".to_string(),
            content: "We are now accepting warm clothes and blankets for the winter drive."
                .to_string(),
            date: now,
            author: "Admin".to_string(),
        },
    )
    .await?;

    Ok(true)
}

// ---- Volunteers ----

fn volunteer_from_row(row: &Row<'_>) -> rusqlite::Result<Volunteer> {
    let skills: String = row.get("skills")?;
    let reviews: String = row.get("reviews")?;
    let registered: String = row.get("registered_events")?;
    let status: String = row.get("status")?;
    Ok(Volunteer {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        skills: serde_json::from_str(&skills).unwrap_or_default(),
        availability: row.get("availability")?,
        status: VolunteerStatus::parse(&status).unwrap_or(VolunteerStatus::Pending),
        password_hash: row.get("password_hash")?,
        avatar_url: row.get("avatar_url")?,
        rating: row.get("rating")?,
        reviews: serde_json::from_str(&reviews).unwrap_or_default(),
        joined_date: row.get("joined_date")?,
        registered_events: serde_json::from_str(&registered).unwrap_or_default(),
        points: row.get("points")?,
    })
}

const VOLUNTEER_COLS: &str = "id, name, email, phone, skills, availability, status, \
     password_hash, avatar_url, rating, reviews, joined_date, registered_events, points";

pub async fn list_volunteers(pool: &DbPool) -> anyhow::Result<Vec<Volunteer>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {VOLUNTEER_COLS} FROM volunteers ORDER BY joined_date DESC"
    ))?;
    let rows = stmt.query_map([], volunteer_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub async fn find_volunteer_by_email(
    pool: &DbPool,
    email: &str,
) -> anyhow::Result<Option<Volunteer>> {
    let conn = pool.get()?;
    let found = conn
        .query_row(
            &format!("SELECT {VOLUNTEER_COLS} FROM volunteers WHERE email = ?1"),
            params![email],
            volunteer_from_row,
        )
        .optional()?;
    Ok(found)
}

pub async fn find_volunteer_by_id(pool: &DbPool, id: &str) -> anyhow::Result<Option<Volunteer>> {
    let conn = pool.get()?;
    let found = conn
        .query_row(
            &format!("SELECT {VOLUNTEER_COLS} FROM volunteers WHERE id = ?1"),
            params![id],
            volunteer_from_row,
        )
        .optional()?;
    Ok(found)
}

/// Inserts a volunteer. Returns `false` when the unique email index
/// rejects the row, so a lost check-then-insert race still surfaces as a
/// duplicate rather than an internal error.
pub async fn add_volunteer(pool: &DbPool, volunteer: &Volunteer) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let inserted = conn.execute(
        "INSERT INTO volunteers (id, name, email, phone, skills, availability, status, \
         password_hash, avatar_url, rating, reviews, joined_date, registered_events, points) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            volunteer.id,
            volunteer.name,
            volunteer.email,
            volunteer.phone,
            serde_json::to_string(&volunteer.skills)?,
            volunteer.availability,
            volunteer.status.as_str(),
            volunteer.password_hash,
            volunteer.avatar_url,
            volunteer.rating,
            serde_json::to_string(&volunteer.reviews)?,
            volunteer.joined_date,
            serde_json::to_string(&volunteer.registered_events)?,
            volunteer.points,
        ],
    );
    match inserted {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_volunteer_status(
    pool: &DbPool,
    id: &str,
    status: VolunteerStatus,
) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE volunteers SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(changed > 0)
}

/// Writes the profile fields as given; a `None` avatar clears it.
pub async fn update_volunteer_profile(
    pool: &DbPool,
    id: &str,
    name: &str,
    avatar_url: &Option<String>,
) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE volunteers SET name = ?1, avatar_url = ?2 WHERE id = ?3",
        params![name, avatar_url, id],
    )?;
    Ok(changed > 0)
}

pub async fn update_volunteer_password(
    pool: &DbPool,
    id: &str,
    password_hash: &str,
) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE volunteers SET password_hash = ?1 WHERE id = ?2",
        params![password_hash, id],
    )?;
    Ok(changed > 0)
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    AlreadyRegistered,
    NotFound,
}

/// Appends an event id to a volunteer's registrations. The read and the
/// write happen inside one IMMEDIATE transaction so two concurrent
/// registrations cannot both observe the pre-insert set.
pub async fn register_volunteer_for_event(
    pool: &DbPool,
    volunteer_id: &str,
    event_id: &str,
) -> anyhow::Result<RegisterOutcome> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let raw: Option<String> = tx
        .query_row(
            "SELECT registered_events FROM volunteers WHERE id = ?1",
            params![volunteer_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(raw) = raw else {
        return Ok(RegisterOutcome::NotFound);
    };

    let mut registered: Vec<String> = serde_json::from_str(&raw).unwrap_or_default();
    if registered.iter().any(|e| e == event_id) {
        return Ok(RegisterOutcome::AlreadyRegistered);
    }
    registered.push(event_id.to_string());

    tx.execute(
        "UPDATE volunteers SET registered_events = ?1 WHERE id = ?2",
        params![serde_json::to_string(&registered)?, volunteer_id],
    )?;
    tx.commit()?;
    Ok(RegisterOutcome::Registered)
}

// ---- Events ----

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let status: String = row.get("status")?;
    let metrics: Option<String> = row.get("metrics")?;
    let fund_goal: Option<f64> = row.get("fund_goal")?;
    let fund_raised: f64 = row.get("fund_raised")?;
    Ok(Event {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        date: row.get("date")?,
        location: row.get("location")?,
        status: EventStatus::parse(&status).unwrap_or(EventStatus::Upcoming),
        metrics: metrics.and_then(|m| serde_json::from_str::<EventMetrics>(&m).ok()),
        // A campaign exists once there is either a target or money raised.
        fundraising: if fund_goal.is_some() || fund_raised > 0.0 {
            Some(EventFundraising {
                goal: fund_goal,
                raised: fund_raised,
            })
        } else {
            None
        },
    })
}

const EVENT_COLS: &str =
    "id, title, description, date, location, status, metrics, fund_goal, fund_raised";

pub async fn list_events(pool: &DbPool) -> anyhow::Result<Vec<Event>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!("SELECT {EVENT_COLS} FROM events ORDER BY date DESC"))?;
    let rows = stmt.query_map([], event_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub async fn find_event(pool: &DbPool, id: &str) -> anyhow::Result<Option<Event>> {
    let conn = pool.get()?;
    let found = conn
        .query_row(
            &format!("SELECT {EVENT_COLS} FROM events WHERE id = ?1"),
            params![id],
            event_from_row,
        )
        .optional()?;
    Ok(found)
}

pub async fn add_event(pool: &DbPool, event: &Event) -> anyhow::Result<()> {
    let conn = pool.get()?;
    let metrics = event
        .metrics
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        "INSERT INTO events (id, title, description, date, location, status, metrics, \
         fund_goal, fund_raised) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            event.id,
            event.title,
            event.description,
            event.date,
            event.location,
            event.status.as_str(),
            metrics,
            event.fundraising.as_ref().and_then(|f| f.goal),
            event.fundraising.as_ref().map(|f| f.raised).unwrap_or(0.0),
        ],
    )?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    Invalid(EventStatus),
    NotFound,
}

/// Applies a lifecycle transition, rejecting anything outside
/// `EventStatus::can_transition_to`.
pub async fn set_event_status(
    pool: &DbPool,
    id: &str,
    next: EventStatus,
) -> anyhow::Result<TransitionOutcome> {
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current: Option<String> = tx
        .query_row("SELECT status FROM events WHERE id = ?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    let Some(current) = current.and_then(|s| EventStatus::parse(&s)) else {
        return Ok(TransitionOutcome::NotFound);
    };

    if !current.can_transition_to(next) {
        return Ok(TransitionOutcome::Invalid(current));
    }

    tx.execute(
        "UPDATE events SET status = ?1 WHERE id = ?2",
        params![next.as_str(), id],
    )?;
    tx.commit()?;
    Ok(TransitionOutcome::Applied)
}

/// Replaces the metrics sub-record wholesale.
pub async fn update_event_metrics(
    pool: &DbPool,
    id: &str,
    metrics: &EventMetrics,
) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE events SET metrics = ?1 WHERE id = ?2",
        params![serde_json::to_string(metrics)?, id],
    )?;
    Ok(changed > 0)
}

/// Atomic increment of the fundraising ledger. The addition happens in SQL,
/// so concurrent donations to the same event cannot lose updates. The goal
/// is left untouched; events without a campaign target keep a NULL goal.
pub async fn increment_event_raised(pool: &DbPool, id: &str, amount: f64) -> anyhow::Result<bool> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE events SET fund_raised = fund_raised + ?1 WHERE id = ?2",
        params![amount, id],
    )?;
    Ok(changed > 0)
}

// ---- Event updates ----

fn event_update_from_row(row: &Row<'_>) -> rusqlite::Result<EventUpdate> {
    Ok(EventUpdate {
        id: row.get("id")?,
        event_id: row.get("event_id")?,
        content: row.get("content")?,
        author_id: row.get("author_id")?,
        author_name: row.get("author_name")?,
        timestamp: row.get("timestamp")?,
        image_url: row.get("image_url")?,
    })
}

pub async fn add_event_update(pool: &DbPool, update: &EventUpdate) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO event_updates (id, event_id, content, author_id, author_name, timestamp, \
         image_url) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            update.id,
            update.event_id,
            update.content,
            update.author_id,
            update.author_name,
            update.timestamp,
            update.image_url,
        ],
    )?;
    Ok(())
}

pub async fn list_event_updates(pool: &DbPool, event_id: &str) -> anyhow::Result<Vec<EventUpdate>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, event_id, content, author_id, author_name, timestamp, image_url \
         FROM event_updates WHERE event_id = ?1 ORDER BY timestamp DESC",
    )?;
    let rows = stmt.query_map(params![event_id], event_update_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---- Donations ----

pub async fn add_donation(pool: &DbPool, donation: &Donation) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO donations (id, donor_name, donor_email, amount, date, campaign_id, \
         receipt_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            donation.id,
            donation.donor_name,
            donation.donor_email,
            donation.amount,
            donation.date,
            donation.campaign_id,
            donation.receipt_id,
        ],
    )?;
    Ok(())
}

pub async fn list_donations(pool: &DbPool) -> anyhow::Result<Vec<Donation>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, donor_name, donor_email, amount, date, campaign_id, receipt_id \
         FROM donations ORDER BY date DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Donation {
            id: row.get("id")?,
            donor_name: row.get("donor_name")?,
            donor_email: row.get("donor_email")?,
            amount: row.get("amount")?,
            date: row.get("date")?,
            campaign_id: row.get("campaign_id")?,
            receipt_id: row.get("receipt_id")?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---- Announcements ----

pub async fn add_announcement(pool: &DbPool, announcement: &Announcement) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO announcements (id, title, content, date, author) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            announcement.id,
            announcement.title,
            announcement.content,
            announcement.date,
            announcement.author,
        ],
    )?;
    Ok(())
}

pub async fn list_announcements(pool: &DbPool) -> anyhow::Result<Vec<Announcement>> {
    let conn = pool.get()?;
    let mut stmt = conn
        .prepare("SELECT id, title, content, date, author FROM announcements ORDER BY date DESC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Announcement {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            date: row.get("date")?,
            author: row.get("author")?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---- Audit log ----

pub async fn log_audit(
    pool: &DbPool,
    action: &str,
    details: &str,
    admin_id: &str,
) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO audit_logs (id, action, details, admin_id, timestamp) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            Uuid::new_v4().to_string(),
            action,
            details,
            admin_id,
            Utc::now(),
        ],
    )?;
    Ok(())
}

pub async fn list_audit_logs(pool: &DbPool) -> anyhow::Result<Vec<AuditLog>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, action, details, admin_id, timestamp FROM audit_logs \
         ORDER BY timestamp DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(AuditLog {
            id: row.get("id")?,
            action: row.get("action")?,
            details: row.get("details")?,
            admin_id: row.get("admin_id")?,
            timestamp: row.get("timestamp")?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---- Staff ----

fn staff_from_row(row: &Row<'_>) -> rusqlite::Result<Staff> {
    let role: String = row.get("role")?;
    let permissions: String = row.get("permissions")?;
    Ok(Staff {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        role: StaffRole::parse(&role).unwrap_or(StaffRole::Staff),
        permissions: serde_json::from_str(&permissions).unwrap_or_default(),
    })
}

pub async fn add_staff(pool: &DbPool, staff: &Staff) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO staff (id, username, password_hash, role, permissions) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            staff.id,
            staff.username,
            staff.password_hash,
            staff.role.as_str(),
            serde_json::to_string(&staff.permissions)?,
        ],
    )?;
    Ok(())
}

pub async fn find_staff_by_username(
    pool: &DbPool,
    username: &str,
) -> anyhow::Result<Option<Staff>> {
    let conn = pool.get()?;
    let found = conn
        .query_row(
            "SELECT id, username, password_hash, role, permissions FROM staff \
             WHERE username = ?1",
            params![username],
            staff_from_row,
        )
        .optional()?;
    Ok(found)
}

pub async fn find_staff_by_id(pool: &DbPool, id: &str) -> anyhow::Result<Option<Staff>> {
    let conn = pool.get()?;
    let found = conn
        .query_row(
            "SELECT id, username, password_hash, role, permissions FROM staff WHERE id = ?1",
            params![id],
            staff_from_row,
        )
        .optional()?;
    Ok(found)
}

pub async fn list_staff(pool: &DbPool) -> anyhow::Result<Vec<Staff>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, role, permissions FROM staff ORDER BY username",
    )?;
    let rows = stmt.query_map([], staff_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---- Feedback ----

pub async fn add_feedback(pool: &DbPool, feedback: &Feedback) -> anyhow::Result<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO feedback (id, event_id, volunteer_id, volunteer_name, rating, comment, \
         timestamp) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            feedback.id,
            feedback.event_id,
            feedback.volunteer_id,
            feedback.volunteer_name,
            feedback.rating,
            feedback.comment,
            feedback.timestamp,
        ],
    )?;
    Ok(())
}

pub async fn list_feedback_for_event(
    pool: &DbPool,
    event_id: &str,
) -> anyhow::Result<Vec<Feedback>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, event_id, volunteer_id, volunteer_name, rating, comment, timestamp \
         FROM feedback WHERE event_id = ?1 ORDER BY timestamp DESC",
    )?;
    let rows = stmt.query_map(params![event_id], |row| {
        Ok(Feedback {
            id: row.get("id")?,
            event_id: row.get("event_id")?,
            volunteer_id: row.get("volunteer_id")?,
            volunteer_name: row.get("volunteer_name")?,
            rating: row.get("rating")?,
            comment: row.get("comment")?,
            timestamp: row.get("timestamp")?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
