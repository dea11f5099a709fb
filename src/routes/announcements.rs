use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{self, AdminAction, StaffSession};
use crate::db::models::Announcement;
use crate::db::{self};
use crate::error::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
}

pub async fn create_announcement(
    State(state): State<AppState>,
    staff: StaffSession,
    Json(req): Json<CreateAnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ManageAnnouncements)?;

    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and content are required".to_string(),
        ));
    }

    let announcement = Announcement {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        content: req.content.trim().to_string(),
        date: Utc::now(),
        author: staff.username.clone(),
    };
    db::add_announcement(&state.db, &announcement).await?;

    db::log_audit(
        &state.db,
        "ANNOUNCEMENT_CREATED",
        &format!("New announcement: {}", announcement.title),
        &staff.username,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": announcement.id })),
    ))
}

pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let announcements = db::list_announcements(&state.db).await?;
    Ok(Json(json!({ "announcements": announcements })))
}
