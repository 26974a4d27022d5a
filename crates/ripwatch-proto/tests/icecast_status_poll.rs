use std::time::{Duration, Instant};

use ripwatch_proto::icecast::parse_status;
use ripwatch_proto::nowplaying::NowPlaying;

#[derive(Debug, Clone)]
struct ProbeConfig {
    status_url: String,
    mount: String,
    polls: usize,
    interval: Duration,
    request_timeout: Duration,
}

/// Live-network diagnostic: poll a real Icecast status endpoint a few times
/// and report what the parser and track-change logic make of it.
#[tokio::test]
#[ignore = "network diagnostic harness; run explicitly with --ignored --nocapture"]
async fn poll_live_icecast_status() {
    let cfg = ProbeConfig {
        status_url: env_string(
            "ICECAST_POLL_URL",
            "http://localhost:8000/status-json.xsl",
        ),
        mount: env_string("ICECAST_POLL_MOUNT", "/radio.ogg"),
        polls: env_usize("ICECAST_POLL_COUNT", 3).max(1),
        interval: Duration::from_millis(env_u64("ICECAST_POLL_INTERVAL_MS", 5000)),
        request_timeout: Duration::from_millis(env_u64("ICECAST_POLL_TIMEOUT_MS", 4000)),
    };

    let client = reqwest::Client::builder()
        .user_agent("ripwatch-status-poll-diagnostic/0.1")
        .timeout(cfg.request_timeout)
        .build()
        .expect("failed to build reqwest client");

    println!(
        "polling {} mount={} polls={} interval={}ms",
        cfg.status_url,
        cfg.mount,
        cfg.polls,
        cfg.interval.as_millis()
    );

    let mut now_playing = NowPlaying::new();
    let mut ok_count = 0usize;
    let mut meta_count = 0usize;
    let mut change_count = 0usize;

    for i in 0..cfg.polls {
        let started = Instant::now();
        let outcome = match client.get(&cfg.status_url).send().await {
            Ok(resp) => match resp.error_for_status() {
                Ok(ok) => match ok.text().await {
                    Ok(body) => {
                        ok_count += 1;
                        match parse_status(&body, &cfg.mount) {
                            Some(meta) => {
                                meta_count += 1;
                                let changed = now_playing.observe(&meta).is_some();
                                if changed {
                                    change_count += 1;
                                }
                                format!(
                                    "meta artist={:?} title={:?} listeners={} changed={}",
                                    meta.artist, meta.title, meta.listeners, changed
                                )
                            }
                            None => "no metadata (empty title or no source)".to_string(),
                        }
                    }
                    Err(e) => format!("body read error: {}", e),
                },
                Err(e) => format!("http error: {}", e),
            },
            Err(e) => format!("request error: {}", e),
        };

        println!(
            "[{}/{}] {:>5}ms  {}",
            i + 1,
            cfg.polls,
            started.elapsed().as_millis(),
            outcome
        );

        if i + 1 < cfg.polls {
            tokio::time::sleep(cfg.interval).await;
        }
    }

    println!("--- summary ---");
    println!("polls: {}", cfg.polls);
    println!("http_ok: {}", ok_count);
    println!("with_metadata: {}", meta_count);
    println!("track_changes: {}", change_count);
    println!("history_len: {}", now_playing.history().len());

    assert!(ok_count > 0, "no successful polls against {}", cfg.status_url);
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}
