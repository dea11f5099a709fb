mod common;

use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;

use common::{admin_token, create_event, request, spawn_app};
use hope_connect::db;
use hope_connect::db::models::EventStatus;
use hope_connect::feed::LiveFeed;

/// Serves the app on an ephemeral port and returns its base URL.
async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn poller_replaces_the_list_wholesale() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Live Event", None).await;
    request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/start"),
        Some(&admin),
        None,
    )
    .await;
    request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/updates"),
        Some(&admin),
        Some(json!({ "content": "Doors open" })),
    )
    .await;

    let base_url = serve(app.router.clone()).await;
    let feed = LiveFeed::spawn(
        reqwest::Client::new(),
        base_url,
        id.clone(),
        Duration::from_millis(50),
    );
    let mut rx = feed.subscribe();

    timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.expect("feed sender dropped");
            if !rx.borrow_and_update().is_empty() {
                break;
            }
        }
    })
    .await
    .expect("first snapshot");
    assert_eq!(rx.borrow()[0].content, "Doors open");

    request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/updates"),
        Some(&admin),
        Some(json!({ "content": "Serving lunch" })),
    )
    .await;

    timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.expect("feed sender dropped");
            if rx.borrow_and_update().len() == 2 {
                break;
            }
        }
    })
    .await
    .expect("second snapshot");
    // Newest first, previous entry still present.
    assert_eq!(rx.borrow()[0].content, "Serving lunch");
    assert_eq!(rx.borrow()[1].content, "Doors open");

    feed.stop();
}

#[tokio::test]
async fn poller_exits_when_the_event_goes_dark() {
    let app = spawn_app().await;
    let admin = admin_token(&app.router).await;
    let id = create_event(&app.router, &admin, "Short Event", None).await;
    request(
        &app.router,
        "POST",
        &format!("/api/events/{id}/start"),
        Some(&admin),
        None,
    )
    .await;

    let base_url = serve(app.router.clone()).await;
    let feed = LiveFeed::spawn(
        reqwest::Client::new(),
        base_url,
        id.clone(),
        Duration::from_millis(50),
    );

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(!feed.is_finished());

    db::set_event_status(&app.state.db, &id, EventStatus::Completed)
        .await
        .unwrap();

    wait_until(|| feed.is_finished()).await;
}

#[tokio::test]
async fn poller_survives_fetch_errors_until_stopped() {
    // Nothing listens on this address; every poll fails.
    let feed = LiveFeed::spawn(
        reqwest::Client::new(),
        "http://127.0.0.1:1".to_string(),
        "ghost-event".to_string(),
        Duration::from_millis(30),
    );

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!feed.is_finished());

    feed.stop();
    wait_until(|| feed.is_finished()).await;
}
