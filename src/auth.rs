use std::future::Future;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier,
    SaltString};
use argon2::Argon2;
use axum::{
    extract::{FromRequestParts, Json, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::models::{StaffRole, Volunteer, VolunteerStatus};
use crate::db::{self};
use crate::error::AppError;
use crate::AppState;

const SESSION_COOKIE_NAME: &str = "session";
const BOOTSTRAP_ADMIN_ID: &str = "bootstrap";

pub const TRACK_VOLUNTEER: &str = "volunteer";
pub const TRACK_STAFF: &str = "staff";

pub const PERM_VIEW_AUDITS: &str = "VIEW_AUDITS";
pub const PERM_APPROVE_USERS: &str = "APPROVE_USERS";

// ---- Passwords ----

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

// ---- Session tokens ----

/// Signed session claims. The token never carries roles or permissions;
/// those are re-resolved from the store on every request.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    track: String,
    exp: usize,
}

pub fn create_session_token(sub: &str, track: &str, secret: &str) -> anyhow::Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| anyhow::anyhow!("invalid expiry timestamp"))?
        .timestamp();

    let claims = Claims {
        sub: sub.to_string(),
        track: track.to_string(),
        exp: expiration as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("session token rejected: {e}");
        AppError::Unauthenticated
    })
}

pub fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|h| h.to_str().ok()) {
        for cookie in cookie_header.split(';') {
            if let Some((k, v)) = cookie.trim().split_once('=') {
                if k == SESSION_COOKIE_NAME {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

fn build_session_cookie(token: &str) -> String {
    let secure = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string())
        == "production";
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age=86400",
        SESSION_COOKIE_NAME, token
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_session_cookie() -> String {
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        SESSION_COOKIE_NAME
    )
}

// ---- Resolved identities ----

/// A staff identity resolved from the store (or the bootstrap account) on
/// the current request.
#[derive(Debug, Clone)]
pub struct StaffSession {
    pub id: String,
    pub username: String,
    pub role: StaffRole,
    pub permissions: Vec<String>,
}

/// An APPROVED volunteer resolved from the store on the current request.
#[derive(Debug, Clone)]
pub struct VolunteerSession(pub Volunteer);

/// Either identity track; used by handlers open to both (posting event
/// updates).
#[derive(Debug, Clone)]
pub enum Session {
    Staff(StaffSession),
    Volunteer(VolunteerSession),
}

async fn resolve_session(parts: &Parts, state: &AppState) -> Result<Session, AppError> {
    let token = extract_token_from_headers(&parts.headers).ok_or(AppError::Unauthenticated)?;
    let claims = decode_claims(&token, &state.config.session_secret)?;

    match claims.track.as_str() {
        TRACK_STAFF => {
            if claims.sub == BOOTSTRAP_ADMIN_ID {
                return Ok(Session::Staff(StaffSession {
                    id: BOOTSTRAP_ADMIN_ID.to_string(),
                    username: state.config.admin_username.clone(),
                    role: StaffRole::SuperAdmin,
                    permissions: vec!["*".to_string()],
                }));
            }
            let staff = db::find_staff_by_id(&state.db, &claims.sub)
                .await?
                .ok_or(AppError::Unauthenticated)?;
            Ok(Session::Staff(StaffSession {
                id: staff.id,
                username: staff.username,
                role: staff.role,
                permissions: staff.permissions,
            }))
        }
        TRACK_VOLUNTEER => {
            let volunteer = db::find_volunteer_by_id(&state.db, &claims.sub)
                .await?
                .ok_or(AppError::Unauthenticated)?;
            if volunteer.status != VolunteerStatus::Approved {
                return Err(AppError::Unauthorized(
                    "Your account is pending approval".to_string(),
                ));
            }
            Ok(Session::Volunteer(VolunteerSession(volunteer)))
        }
        _ => Err(AppError::Unauthenticated),
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move { resolve_session(parts, state).await }
    }
}

impl FromRequestParts<AppState> for StaffSession {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            match resolve_session(parts, state).await? {
                Session::Staff(staff) => Ok(staff),
                Session::Volunteer(_) => {
                    Err(AppError::Forbidden("Staff session required".to_string()))
                }
            }
        }
    }
}

impl FromRequestParts<AppState> for VolunteerSession {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            match resolve_session(parts, state).await? {
                Session::Volunteer(volunteer) => Ok(volunteer),
                Session::Staff(_) => Err(AppError::Forbidden(
                    "Volunteer session required".to_string(),
                )),
            }
        }
    }
}

// ---- Authorization gate ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ApproveVolunteers,
    ViewAuditLog,
    ManageStaff,
    ManageEvents,
    PostUpdates,
    ViewDonations,
    ManageAnnouncements,
    ViewFeedback,
    UploadData,
}

pub fn can_perform(session: &StaffSession, action: AdminAction) -> bool {
    if session.role == StaffRole::SuperAdmin {
        return true;
    }
    match action {
        AdminAction::ApproveVolunteers => {
            session.permissions.iter().any(|p| p == PERM_APPROVE_USERS)
        }
        AdminAction::ViewAuditLog => session.permissions.iter().any(|p| p == PERM_VIEW_AUDITS),
        AdminAction::ManageStaff => false,
        AdminAction::ManageEvents
        | AdminAction::PostUpdates
        | AdminAction::ViewDonations
        | AdminAction::ManageAnnouncements
        | AdminAction::ViewFeedback
        | AdminAction::UploadData => true,
    }
}

pub fn require(session: &StaffSession, action: AdminAction) -> Result<(), AppError> {
    if can_perform(session, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Insufficient permissions".to_string()))
    }
}

// ---- Handlers ----

#[derive(Deserialize)]
pub struct VolunteerLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct StaffLoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login_volunteer(
    State(state): State<AppState>,
    Json(req): Json<VolunteerLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let volunteer = db::find_volunteer_by_email(&state.db, &req.email).await?;

    // Unknown email and wrong password are deliberately indistinguishable.
    let Some(volunteer) = volunteer else {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };
    let valid = volunteer
        .password_hash
        .as_deref()
        .map(|hash| verify_password(&req.password, hash))
        .unwrap_or(false);
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    if volunteer.status != VolunteerStatus::Approved {
        return Err(AppError::Unauthorized(
            "Your account is pending approval".to_string(),
        ));
    }

    let token = create_session_token(&volunteer.id, TRACK_VOLUNTEER, &state.config.session_secret)?;
    Ok(session_response(token))
}

pub async fn login_staff(
    State(state): State<AppState>,
    Json(req): Json<StaffLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Bootstrap SUPER_ADMIN lives in config, outside the store.
    if req.username == state.config.admin_username && req.password == state.config.admin_password {
        let token =
            create_session_token(BOOTSTRAP_ADMIN_ID, TRACK_STAFF, &state.config.session_secret)?;
        return Ok(session_response(token));
    }

    let staff = db::find_staff_by_username(&state.db, &req.username).await?;
    let Some(staff) = staff else {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };
    if !verify_password(&req.password, &staff.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = create_session_token(&staff.id, TRACK_STAFF, &state.config.session_secret)?;
    Ok(session_response(token))
}

fn session_response(token: String) -> impl IntoResponse {
    let cookie = build_session_cookie(&token);
    let mut response = Json(json!({ "success": true, "token": token })).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

pub async fn logout() -> impl IntoResponse {
    let mut response = Json(json!({ "success": true })).into_response();
    if let Ok(value) = HeaderValue::from_str(&clear_session_cookie()) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

pub async fn me(session: Session) -> Result<impl IntoResponse, AppError> {
    match session {
        Session::Volunteer(VolunteerSession(volunteer)) => {
            Ok(Json(json!({ "track": TRACK_VOLUNTEER, "user": volunteer })))
        }
        Session::Staff(staff) => Ok(Json(json!({
            "track": TRACK_STAFF,
            "user": {
                "id": staff.id,
                "username": staff.username,
                "role": staff.role,
                "permissions": staff.permissions,
            }
        }))),
    }
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub avatar_url: Option<String>,
}

pub async fn update_me(
    State(state): State<AppState>,
    VolunteerSession(volunteer): VolunteerSession,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    db::update_volunteer_profile(&state.db, &volunteer.id, req.name.trim(), &req.avatar_url)
        .await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

pub async fn update_password(
    State(state): State<AppState>,
    VolunteerSession(volunteer): VolunteerSession,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.password != req.confirm_password {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    let hash = hash_password(&req.password)?;
    db::update_volunteer_password(&state.db, &volunteer.id, &hash).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn my_events(
    State(state): State<AppState>,
    VolunteerSession(volunteer): VolunteerSession,
) -> Result<impl IntoResponse, AppError> {
    let events = db::list_events(&state.db).await?;
    let registered: Vec<_> = events
        .into_iter()
        .filter(|e| volunteer.registered_events.iter().any(|id| id == &e.id))
        .collect();
    Ok(Json(json!({ "events": registered })))
}
