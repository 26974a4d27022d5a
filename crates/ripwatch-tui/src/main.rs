mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod http;
mod player;
mod poller;
mod sse;
mod theme;
mod widgets;

use tokio::sync::mpsc;

use ripwatch_proto::progress::ProgressStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = ripwatch_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("tui.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("ripwatch log: {}", log_path.display());

    tracing::info!("ripwatch starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = ripwatch_proto::config::Config::load().unwrap_or_default();

    // ── AppMessage channel (background tasks → app loop) ────────────────────
    let (tx, rx) = mpsc::channel::<app::AppMessage>(1024);

    // ── Shared progress snapshot (app loop writes, HTTP server reads) ────────
    let store = ProgressStore::new();

    // ── Event-stream subscription ────────────────────────────────────────────
    sse::spawn(config.monitor.events_url(), tx.clone());

    // ── Icecast metadata poller ──────────────────────────────────────────────
    poller::spawn(
        config.radio.status_url(),
        config.radio.stream_mount.clone(),
        config.radio.poll_interval(),
        tx.clone(),
    );

    // ── Embedded snapshot/health server ──────────────────────────────────────
    if config.server.enabled {
        http::start_server(
            config.server.bind_address.clone(),
            config.server.port,
            store.clone(),
        );
    }

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(config, store, tx);
    app.run(rx).await?;

    Ok(())
}
