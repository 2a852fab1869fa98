use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use larder_engine::Engine;

use crate::delivery::ReplyDelivery;
use crate::webhook::WebhookPayload;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
    /// Directory export artifacts are served from; must match the
    /// directory the export sink writes into.
    pub export_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            export_dir: PathBuf::from("exports"),
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub delivery: Arc<dyn ReplyDelivery>,
    pub export_dir: PathBuf,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .route("/export/{file}", get(export_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Create and start the server. Returns a handle that keeps the serve
/// task alive and reports the bound port (pass port 0 for a random one).
pub async fn start(
    config: ServerConfig,
    engine: Arc<Engine>,
    delivery: Arc<dyn ReplyDelivery>,
) -> Result<ServerHandle, std::io::Error> {
    let state = AppState {
        engine,
        delivery,
        export_dir: config.export_dir,
    };
    let router = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "larder server started");

    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server,
    })
}

pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}

async fn index_handler() -> &'static str {
    "✅ larder is running"
}

/// Liveness plus store reachability.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.ping() {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::error!(error = %e, "health probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}

/// Platform webhook. Always answers 200 — a payload we cannot use is
/// acknowledged as "ignored", and handler failures have already been
/// converted to reply text by the engine.
async fn webhook_handler(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let Ok(payload) = serde_json::from_str::<WebhookPayload>(&body) else {
        return (StatusCode::OK, "ignored");
    };
    let messages = payload.into_messages();
    if messages.is_empty() {
        return (StatusCode::OK, "ignored");
    }

    for message in messages {
        let reply = state.engine.handle_message(&message);
        if let Err(e) = state.delivery.deliver(&message.reply_token, &reply).await {
            tracing::warn!(error = %e, context = %message.context_id, "reply delivery failed");
        }
    }
    (StatusCode::OK, "ok")
}

/// Download route for materialized exports.
async fn export_handler(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> axum::response::Response {
    // The export dir holds only sink-generated names; anything that
    // could point elsewhere is treated as absent.
    if file.contains('/') || file.contains('\\') || file.contains("..") {
        return StatusCode::NOT_FOUND.into_response();
    }
    match tokio::fs::read(state.export_dir.join(&file)).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
