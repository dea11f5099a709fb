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
use crate::db::models::Donation;
use crate::db::{self};
use crate::error::AppError;
use crate::notify;
use crate::AppState;

#[derive(Deserialize)]
pub struct DonationRequest {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    pub event_id: Option<String>,
}

pub async fn process_donation(
    State(state): State<AppState>,
    Json(req): Json<DonationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.donor_name.trim().is_empty() || req.donor_email.trim().is_empty() {
        return Err(AppError::Validation(
            "Donor name and email are required".to_string(),
        ));
    }
    if !(req.amount.is_finite() && req.amount > 0.0) {
        return Err(AppError::Validation(
            "Donation amount must be positive".to_string(),
        ));
    }

    if let Some(event_id) = &req.event_id {
        if db::find_event(&state.db, event_id).await?.is_none() {
            return Err(AppError::NotFound("Event"));
        }
    }

    let donation = Donation {
        id: Uuid::new_v4().to_string(),
        donor_name: req.donor_name.trim().to_string(),
        donor_email: req.donor_email.trim().to_string(),
        amount: req.amount,
        date: Utc::now(),
        campaign_id: req.event_id.clone(),
        receipt_id: format!("RCPT-{}", Utc::now().timestamp_millis()),
    };
    db::add_donation(&state.db, &donation).await?;

    if let Some(event_id) = &req.event_id {
        // Ledger increment happens in SQL, so concurrent donations to the
        // same event cannot lose updates.
        db::increment_event_raised(&state.db, event_id, donation.amount).await?;
    }

    db::log_audit(
        &state.db,
        "DONATION_RECORDED",
        &format!(
            "Donation of {} from {} ({})",
            donation.amount, donation.donor_name, donation.receipt_id
        ),
        "SYSTEM",
    )
    .await?;

    // Fire-and-forget; a failed send is logged, never retried.
    let (to, name, amount) = (
        donation.donor_email.clone(),
        donation.donor_name.clone(),
        donation.amount,
    );
    tokio::spawn(async move {
        if let Err(e) = notify::send_thank_you_email(&to, &name, amount).await {
            tracing::warn!("thank-you email failed: {e}");
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "id": donation.id,
            "receipt_id": donation.receipt_id,
        })),
    ))
}

pub async fn list_donations(
    State(state): State<AppState>,
    staff: StaffSession,
) -> Result<impl IntoResponse, AppError> {
    auth::require(&staff, AdminAction::ViewDonations)?;
    let donations = db::list_donations(&state.db).await?;
    Ok(Json(json!({ "donations": donations })))
}

#[derive(Deserialize)]
pub struct OrderRequest {
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: Option<String>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<OrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.amount <= 0 {
        return Err(AppError::Validation(
            "Order amount must be positive".to_string(),
        ));
    }
    let currency = req.currency.as_deref().unwrap_or("INR");

    let order = notify::create_payment_order(&state.http, &state.config, req.amount, currency)
        .await
        .map_err(|e| {
            tracing::error!("payment order creation failed: {e}");
            AppError::External("Failed to create payment order".to_string())
        })?;

    Ok(Json(json!({ "success": true, "order": order })))
}
