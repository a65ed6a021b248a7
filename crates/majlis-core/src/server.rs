//! Webhook HTTP server: liveness routes and the signed callback endpoint

use crate::runtime::BotRuntime;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use majlis_line::{parse_inbound_events, verify_signature, SIGNATURE_HEADER};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct WebhookState {
    pub runtime: BotRuntime,
    pub channel_secret: String,
    pub started_at: Instant,
}

impl WebhookState {
    pub fn new(runtime: BotRuntime, channel_secret: impl Into<String>) -> Self {
        Self {
            runtime,
            channel_secret: channel_secret.into(),
            started_at: Instant::now(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: u64,
}

pub fn router(state: Arc<WebhookState>, webhook_path: &str) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route(webhook_path, post(callback))
        .with_state(state)
}

/// Bind and serve until `shutdown_rx` flips to true.
pub async fn start_http_server(
    bind: &str,
    app: Router,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "Webhook server listening");

    let handle = tokio::spawn(async move {
        let mut shutdown = shutdown_rx;
        if let Err(error) = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|v| *v).await;
            })
            .await
        {
            tracing::error!(%error, "Webhook server exited with error");
        }
    });

    Ok(handle)
}

async fn health(State(state): State<Arc<WebhookState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

async fn callback(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !verify_signature(&state.channel_secret, &body, signature) {
        warn!("Rejected webhook request with invalid signature");
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    }

    let events = match parse_inbound_events(&body) {
        Ok(events) => events,
        Err(e) => {
            warn!("Discarding webhook body: {}", e);
            return (StatusCode::OK, "OK").into_response();
        }
    };

    debug!(events = events.len(), "Webhook accepted");
    state.runtime.handle_events(&events).await;

    (StatusCode::OK, "OK").into_response()
}
