//! Client side of the live feed: a fixed-interval poller that re-fetches an
//! event's update list while the event is in progress and replaces the
//! displayed list wholesale. No diffing, no backoff; a fetch error is
//! logged and the timer keeps ticking. The loop ends on its own when the
//! event stops being live, or when the consumer calls [`LiveFeed::stop`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::db::models::EventUpdate;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Wire shape of `GET /api/events/{id}/updates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSnapshot {
    pub live: bool,
    pub updates: Vec<EventUpdate>,
}

pub struct LiveFeed {
    rx: watch::Receiver<Vec<EventUpdate>>,
    handle: JoinHandle<()>,
}

impl LiveFeed {
    pub fn spawn(
        client: reqwest::Client,
        base_url: String,
        event_id: String,
        interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(Vec::new());

        let handle = tokio::spawn(async move {
            let url = format!("{base_url}/api/events/{event_id}/updates");
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tick.tick().await;
                match fetch_snapshot(&client, &url).await {
                    Ok(snapshot) => {
                        let live = snapshot.live;
                        // Wholesale replacement of the displayed list.
                        let _ = tx.send(snapshot.updates);
                        if !live {
                            tracing::debug!(%event_id, "event no longer live, stopping feed");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%event_id, "live feed fetch failed: {e}");
                    }
                }
            }
        });

        Self { rx, handle }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<EventUpdate>> {
        self.rx.clone()
    }

    /// Cancels the polling timer (component unmount).
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn fetch_snapshot(client: &reqwest::Client, url: &str) -> anyhow::Result<FeedSnapshot> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        anyhow::bail!("feed endpoint returned status {}", resp.status());
    }
    Ok(resp.json::<FeedSnapshot>().await?)
}
