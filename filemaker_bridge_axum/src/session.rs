use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use filemaker_bridge::{FileMakerBridge, SessionInfo};

pub(super) fn router() -> Router<Arc<FileMakerBridge>> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    healthy: bool,
    session: Option<SessionInfo>,
}

/// Probes the shared data session without creating one.
async fn health(State(bridge): State<Arc<FileMakerBridge>>) -> Json<HealthResponse> {
    let healthy = bridge.sessions().health_check().await;
    let session = bridge.sessions().info().await;
    tracing::debug!("Session health: healthy={}", healthy);
    Json(HealthResponse { healthy, session })
}
