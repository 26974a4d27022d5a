//! Embedded HTTP server — progress snapshot page and health check.

use axum::{response::Html, response::Json, routing::get, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use ripwatch_proto::progress::ProgressStore;
use ripwatch_proto::render::render_page;

#[derive(Clone)]
struct HttpState {
    store: ProgressStore,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    playlists: usize,
    tracks: usize,
}

pub fn start_server(
    bind_address: String,
    port: u16,
    store: ProgressStore,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let app_state = HttpState { store };

        let app = Router::new()
            .route("/", get(progress_page))
            .route("/health", get(health_check))
            .layer(CorsLayer::permissive())
            .with_state(app_state);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP snapshot server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

async fn progress_page(
    axum::extract::State(state): axum::extract::State<HttpState>,
) -> Html<String> {
    let snapshot = state.store.get().await;
    Html(render_page(&snapshot))
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<HttpState>,
) -> Json<Health> {
    let snapshot = state.store.get().await;
    Json(Health {
        status: "healthy",
        playlists: snapshot.playlists.len(),
        tracks: snapshot.tracks.len(),
    })
}
