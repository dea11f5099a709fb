use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod notify;
pub mod routes;

use config::Config;
use db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Sessions (both tracks)
        .route("/api/auth/login", post(auth::login_volunteer))
        .route("/api/auth/admin/login", post(auth::login_staff))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/me", get(auth::me).put(auth::update_me))
        .route("/api/me/password", put(auth::update_password))
        .route("/api/me/events", get(auth::my_events))
        // Volunteers
        .route(
            "/api/volunteers",
            post(routes::volunteers::submit_application).get(routes::volunteers::list_volunteers),
        )
        .route(
            "/api/volunteers/{id}/status",
            put(routes::volunteers::set_volunteer_status),
        )
        .route("/api/leaderboard", get(routes::volunteers::leaderboard))
        // Events
        .route(
            "/api/events",
            get(routes::events::list_events).post(routes::events::create_event),
        )
        .route("/api/events/{id}/start", post(routes::events::start_event))
        .route("/api/events/{id}/end", post(routes::events::end_event))
        .route("/api/events/{id}/cancel", post(routes::events::cancel_event))
        .route("/api/events/{id}/metrics", put(routes::events::update_metrics))
        .route(
            "/api/events/{id}/updates",
            get(routes::events::list_updates).post(routes::events::post_update),
        )
        .route("/api/events/{id}/register", post(routes::events::register))
        .route(
            "/api/events/{id}/feedback",
            post(routes::events::submit_feedback).get(routes::events::list_feedback),
        )
        // Donations
        .route(
            "/api/donations",
            post(routes::donations::process_donation).get(routes::donations::list_donations),
        )
        .route("/api/donations/order", post(routes::donations::create_order))
        // Announcements
        .route(
            "/api/announcements",
            get(routes::announcements::list_announcements)
                .post(routes::announcements::create_announcement),
        )
        // Back office
        .route(
            "/api/staff",
            post(routes::staff::create_staff).get(routes::staff::list_staff),
        )
        .route("/api/audit", get(routes::staff::list_audit_logs))
        .route("/api/data/upload", post(routes::staff::upload_data))
        .route("/api/chat", post(routes::chat::chat))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
