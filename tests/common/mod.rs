#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use hope_connect::{app, config::Config, db, AppState};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Keeps the database directory alive for the test's duration.
    _dir: TempDir,
}

/// Fresh application over an empty temp database (migrations only, no seed).
pub async fn spawn_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("test.db");
    let data_path = dir.path().join("ngo_data.json");

    let pool = db::init_pool(db_path.to_str().expect("db path"))
        .await
        .expect("init pool");
    db::run_migrations(&pool).await.expect("migrations");

    let config = Config {
        port: 0,
        database_path: db_path.to_string_lossy().into_owned(),
        session_secret: "test-secret".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "admin".to_string(),
        gemini_api_key: None,
        payment_key_id: None,
        payment_key_secret: None,
        data_file_path: data_path.to_string_lossy().into_owned(),
    };

    let state = AppState::new(pool, config);
    TestApp {
        router: app(state.clone()),
        state,
        _dir: dir,
    }
}

pub async fn request(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Logs in the bootstrap SUPER_ADMIN and returns its session token.
pub async fn admin_token(router: &Router) -> String {
    let (status, body) = request(
        router,
        "POST",
        "/api/auth/admin/login",
        None,
        Some(json!({ "username": "admin", "password": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

/// Submits an application, approves it, logs in and returns
/// `(volunteer_id, session_token)`.
pub async fn approved_volunteer(router: &Router, admin: &str, email: &str) -> (String, String) {
    let (status, body) = request(
        router,
        "POST",
        "/api/volunteers",
        None,
        Some(json!({
            "name": "Test Volunteer",
            "email": email,
            "phone": "555-0100",
            "skills": "Cooking, Driving",
            "availability": "Weekends",
            "password": "volunteer-pass",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "application failed: {body}");
    let id = body["id"].as_str().expect("volunteer id").to_string();

    let (status, body) = request(
        router,
        "PUT",
        &format!("/api/volunteers/{id}/status"),
        Some(admin),
        Some(json!({ "status": "APPROVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approval failed: {body}");

    let (status, body) = request(
        router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "volunteer-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "volunteer login failed: {body}");
    let token = body["token"].as_str().expect("token").to_string();

    (id, token)
}

/// Creates an event as the given admin and returns its id.
pub async fn create_event(router: &Router, admin: &str, title: &str, goal: Option<f64>) -> String {
    let mut payload = json!({
        "title": title,
        "description": "test event",
        "date": "2026-09-01T10:00:00Z",
        "location": "Community Hall",
    });
    if let Some(goal) = goal {
        payload["fundraising_goal"] = json!(goal);
    }
    let (status, body) = request(router, "POST", "/api/events", Some(admin), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "event create failed: {body}");
    body["id"].as_str().expect("event id").to_string()
}
