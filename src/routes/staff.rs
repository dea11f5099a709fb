use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{self, AdminAction, StaffSession};
use crate::db::models::{Staff, StaffRole};
use crate::db::{self};
use crate::error::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateStaffRequest {
    pub username: String,
    pub password: String,
    pub permissions: Vec<String>,
}

pub async fn create_staff(
    State(state): State<AppState>,
    staff: StaffSession,
    Json(req): Json<CreateStaffRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ManageStaff)?;

    if req.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if db::find_staff_by_username(&state.db, req.username.trim())
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let account = Staff {
        id: Uuid::new_v4().to_string(),
        username: req.username.trim().to_string(),
        password_hash: auth::hash_password(&req.password)?,
        role: StaffRole::Staff,
        permissions: req.permissions,
    };
    db::add_staff(&state.db, &account).await?;

    db::log_audit(
        &state.db,
        "STAFF_CREATED",
        &format!("Staff account created: {}", account.username),
        &staff.username,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": account.id })),
    ))
}

pub async fn list_staff(
    State(state): State<AppState>,
    staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ManageStaff)?;
    let accounts = db::list_staff(&state.db).await?;
    Ok(Json(json!({ "staff": accounts })))
}

pub async fn list_audit_logs(
    State(state): State<AppState>,
    staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ViewAuditLog)?;
    let logs = db::list_audit_logs(&state.db).await?;
    Ok(Json(json!({ "audit_logs": logs })))
}

#[derive(Deserialize)]
pub struct UploadDataRequest {
    pub content: String,
}

/// Persists the AI context document. The body must at least parse as JSON;
/// no schema beyond that is enforced.
pub async fn upload_data(
    State(state): State<AppState>,
    staff: StaffSession,
    Json(req): Json<UploadDataRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::UploadData)?;

    if serde_json::from_str::<Value>(&req.content).is_err() {
        return Err(AppError::Validation(
            "Content is not valid JSON".to_string(),
        ));
    }

    tokio::fs::write(&state.config.data_file_path, &req.content)
        .await
        .map_err(|e| anyhow::anyhow!("failed to persist data file: {e}"))?;

    db::log_audit(
        &state.db,
        "DATA_FILE_UPLOADED",
        &format!("AI context document replaced ({} bytes)", req.content.len()),
        &staff.username,
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}
