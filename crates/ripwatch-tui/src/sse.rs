//! Event-stream subscription task.
//!
//! Owns the whole connect → read → backoff cycle in one loop, so a reconnect
//! can never race a live connection. The backoff resets only after a
//! successful open; malformed event payloads are logged and dropped without
//! killing the stream.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ripwatch_proto::backoff::ReconnectBackoff;
use ripwatch_proto::events::{MonitorEvent, SseParser};

use crate::app::AppMessage;

pub fn spawn(events_url: String, tx: mpsc::Sender<AppMessage>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                warn!("[sse] failed to build http client: {}", e);
                return;
            }
        };

        let mut backoff = ReconnectBackoff::default();

        loop {
            match open_stream(&client, &events_url).await {
                Ok(resp) => {
                    info!("[sse] connected to {}", events_url);
                    if tx.send(AppMessage::SseConnected).await.is_err() {
                        return;
                    }
                    backoff.reset();
                    read_stream(resp, &tx).await;
                    warn!("[sse] stream closed");
                }
                Err(e) => {
                    warn!("[sse] connect failed: {}", e);
                }
            }

            let delay = backoff.next_delay();
            debug!("[sse] reconnecting in {} ms", delay.as_millis());
            if tx
                .send(AppMessage::SseDisconnected { retry_in: delay })
                .await
                .is_err()
            {
                return;
            }
            tokio::time::sleep(delay).await;
        }
    })
}

async fn open_stream(
    client: &reqwest::Client,
    events_url: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .get(events_url)
        .header("Accept", "text/event-stream")
        .send()
        .await?
        .error_for_status()
}

/// Read frames until the stream errors or ends.
async fn read_stream(resp: reqwest::Response, tx: &mpsc::Sender<AppMessage>) {
    let mut parser = SseParser::new();
    let mut stream = resp.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("[sse] read error: {}", e);
                return;
            }
        };

        for frame in parser.feed(&bytes) {
            match MonitorEvent::parse(&frame.event, &frame.data) {
                Ok(Some(event)) => {
                    if tx.send(AppMessage::Monitor(event)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => debug!("[sse] ignoring event {}", frame.event),
                // A bad payload must not take the subscription down.
                Err(e) => warn!("[sse] dropping malformed {} event: {}", frame.event, e),
            }
        }
    }
}
