//! Metadata poll task — fixed-interval Icecast status fetches.
//!
//! Polls are serialized: each fetch+parse completes before the next tick is
//! considered (missed ticks are skipped), so back-to-back polls can never
//! interleave their state updates. A failed poll is logged and skipped; the
//! next tick tries again. The first tick fires immediately on startup.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use ripwatch_proto::icecast::parse_status;

use crate::app::AppMessage;

pub fn spawn(
    status_url: String,
    mount: String,
    interval: Duration,
    tx: mpsc::Sender<AppMessage>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(4))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                warn!("[poll] failed to build http client: {}", e);
                return;
            }
        };

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let body = match fetch_status(&client, &status_url).await {
                Ok(body) => body,
                Err(e) => {
                    // No backoff: wait for the next tick.
                    warn!("[poll] metadata fetch failed: {}", e);
                    continue;
                }
            };

            match parse_status(&body, &mount) {
                Some(meta) => {
                    if tx.send(AppMessage::Metadata(meta)).await.is_err() {
                        return;
                    }
                }
                None => debug!("[poll] status document had no usable metadata"),
            }
        }
    })
}

async fn fetch_status(client: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}
