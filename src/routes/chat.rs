use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::notify;
use crate::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// AI assistant over the uploaded JSON context document.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    if state.config.gemini_api_key.is_none() {
        return Err(AppError::External("AI service not configured".to_string()));
    }

    let context = tokio::fs::read_to_string(&state.config.data_file_path)
        .await
        .unwrap_or_default();

    let response = notify::complete_chat(&state.http, &state.config, &req.message, &context)
        .await
        .map_err(|e| {
            tracing::error!("chat completion failed: {e}");
            AppError::External("AI service request failed".to_string())
        })?;

    Ok(Json(json!({ "response": response })))
}
