use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{self, AdminAction, StaffSession};
use crate::db::models::{Volunteer, VolunteerStatus};
use crate::db::{self};
use crate::error::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct ApplicationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Comma-separated, as submitted by the application form.
    pub skills: String,
    pub availability: String,
    pub password: String,
}

pub async fn submit_application(
    State(state): State<AppState>,
    Json(req): Json<ApplicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    for (field, value) in [
        ("name", &req.name),
        ("email", &req.email),
        ("phone", &req.phone),
        ("availability", &req.availability),
        ("password", &req.password),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("Missing field: {field}")));
        }
    }

    let email = req.email.trim();
    if db::find_volunteer_by_email(&state.db, email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let volunteer = Volunteer {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        email: email.to_string(),
        phone: req.phone.trim().to_string(),
        skills: req
            .skills
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        availability: req.availability.trim().to_string(),
        status: VolunteerStatus::Pending,
        password_hash: Some(auth::hash_password(&req.password)?),
        avatar_url: None,
        rating: None,
        reviews: Vec::new(),
        joined_date: Utc::now(),
        registered_events: Vec::new(),
        points: 0,
    };
    // The unique index backs up the check above under concurrent submits.
    if !db::add_volunteer(&state.db, &volunteer).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    db::log_audit(
        &state.db,
        "VOLUNTEER_APPLICATION",
        &format!("New application from {}", volunteer.name),
        "SYSTEM",
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": volunteer.id })),
    ))
}

pub async fn list_volunteers(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    let volunteers = db::list_volunteers(&state.db).await?;
    Ok(Json(json!({ "volunteers": volunteers })))
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

pub async fn set_volunteer_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
    staff: StaffSession,
    Json(req): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ApproveVolunteers)?;

    let status = match VolunteerStatus::parse(&req.status) {
        Some(s @ (VolunteerStatus::Approved | VolunteerStatus::Rejected)) => s,
        _ => {
            return Err(AppError::Validation(
                "Status must be APPROVED or REJECTED".to_string(),
            ))
        }
    };

    if !db::update_volunteer_status(&state.db, &id, status).await? {
        return Err(AppError::NotFound("Volunteer"));
    }

    db::log_audit(
        &state.db,
        "VOLUNTEER_STATUS_UPDATE",
        &format!("Volunteer {} status updated to {}", id, status.as_str()),
        &staff.username,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut volunteers: Vec<_> = db::list_volunteers(&state.db)
        .await?
        .into_iter()
        .filter(|v| v.status == VolunteerStatus::Approved)
        .collect();
    volunteers.sort_by(|a, b| {
        b.points.cmp(&a.points).then(
            b.rating
                .unwrap_or(0.0)
                .partial_cmp(&a.rating.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    let entries: Vec<_> = volunteers
        .into_iter()
        .map(|v| {
            json!({
                "id": v.id,
                "name": v.name,
                "avatar_url": v.avatar_url,
                "points": v.points,
                "rating": v.rating,
            })
        })
        .collect();
    Ok(Json(json!({ "leaderboard": entries })))
}
