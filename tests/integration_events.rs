mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{admin_token, approved_volunteer, create_event, request, spawn_app};
use hope_connect::db;

#[tokio::test]
async fn staff_actions_require_a_session() {
    let app = spawn_app().await;

    let cases = [
        ("POST", "/api/events".to_string(), json!({
            "title": "T", "description": "", "date": "2026-09-01T10:00:00Z", "location": "L",
        })),
        ("PUT", "/api/events/e1/metrics".to_string(), json!({
            "people_fed": 1, "cost_burnt": 1.0, "partners": "",
        })),
        ("POST", "/api/events/e1/end".to_string(), json!({})),
        ("POST", "/api/staff".to_string(), json!({
            "username": "x", "password": "secret1", "permissions": [],
        })),
    ];
    for (method, uri, body) in cases {
        let (status, _) = request(&app.router, method, &uri, None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn lifecycle_transitions_are_enforced() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Cleanup Drive", None).await;

    // Cannot end an event that never started.
    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/end"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Cannot move event from UPCOMING to COMPLETED");

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/start"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Starting twice is a conflict.
    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/start"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Cannot move event from IN_PROGRESS to IN_PROGRESS");

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/end"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Completed events cannot be cancelled.
    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/cancel"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let event = db::find_event(&app.state.db, &id).await.unwrap().unwrap();
    assert_eq!(event.status, db::models::EventStatus::Completed);
}

#[tokio::test]
async fn upcoming_event_can_be_cancelled() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Rained Out", None).await;

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/cancel"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let event = db::find_event(&app.state.db, &id).await.unwrap().unwrap();
    assert_eq!(event.status, db::models::EventStatus::Cancelled);
}

#[tokio::test]
async fn update_posting_rules() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Soup Kitchen", None).await;
    let (_, registered) = approved_volunteer(&app.router, &admin, "reg@example.com").await;
    let (_, outsider) = approved_volunteer(&app.router, &admin, "out@example.com").await;

    // Not live yet.
    let update = json!({ "content": "Setting up tables" });
    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/updates"),
        Some(&admin),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event is not live");

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/register"),
        Some(&registered),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/start"),
        Some(&admin),
        None,
    )
    .await;

    // Staff and registered volunteers may post, others may not.
    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/updates"),
        Some(&admin),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/updates"),
        Some(&registered),
        Some(json!({ "content": "Serving has started" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/updates"),
        Some(&outsider),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not registered for this event");

    // Feed is newest-first and flagged live.
    let (status, body) = request(
        &app.router,
        "GET",
        &format!("/api/events/{id}/updates"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["live"], true);
    let updates = body["updates"].as_array().unwrap();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0]["content"], "Serving has started");

    // After completion the snapshot goes dark but keeps its history.
    request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/end"),
        Some(&admin),
        None,
    )
    .await;
    let (_, body) = request(
        &app.router,
        "GET",
        &format!("/api/events/{id}/updates"),
        None,
        None,
    )
    .await;
    assert_eq!(body["live"], false);
    assert_eq!(body["updates"].as_array().unwrap().len(), 2);

    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/updates"),
        Some(&admin),
        Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event is not live");
}

#[tokio::test]
async fn double_registration_is_a_conflict() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Tree Planting", None).await;
    let (volunteer_id, token) = approved_volunteer(&app.router, &admin, "tree@example.com").await;

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/register"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/register"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Already registered");

    let volunteer = db::find_volunteer_by_id(&app.state.db, &volunteer_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(volunteer.registered_events, vec![id.clone()]);

    let (status, body) = request(&app.router, "GET", "/api/me/events", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], id);

    let (status, _) = request(
        &app.router,
        "POST",
        "/api/events/missing/register",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_are_replaced_wholesale() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Food Drive", None).await;

    let (status, _) = request(
        &app.router,
        "PUT",
        &format!("/api/events/{id}/metrics"),
        Some(&admin),
        Some(json!({ "people_fed": 120, "cost_burnt": 450.5, "partners": "Acme Corp, City Bank" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app.router,
        "PUT",
        &format!("/api/events/{id}/metrics"),
        Some(&admin),
        Some(json!({ "people_fed": 200, "cost_burnt": 600.0, "partners": "Fresh Farms" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let event = db::find_event(&app.state.db, &id).await.unwrap().unwrap();
    let metrics = event.metrics.unwrap();
    assert_eq!(metrics.people_fed, 200);
    assert_eq!(metrics.partners, vec!["Fresh Farms".to_string()]);
}

#[tokio::test]
async fn feedback_rating_bounds_and_listing() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Shelter Visit", None).await;
    let (_, token) = approved_volunteer(&app.router, &admin, "fb@example.com").await;

    let (status, body) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/feedback"),
        Some(&token),
        Some(json!({ "rating": 0, "comment": "bad rating value" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Rating must be between 1 and 5");

    let (status, _) = request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/feedback"),
        Some(&token),
        Some(json!({ "rating": 5, "comment": "Great event" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app.router,
        "GET",
        &format!("/api/events/{id}/feedback"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let feedback = body["feedback"].as_array().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["rating"], 5);

    // Volunteers cannot read the feedback list.
    let (status, _) = request(
        &app.router,
        "GET",
        &format!("/api/events/{id}/feedback"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
