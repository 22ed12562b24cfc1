//! Combined router for all bridge endpoints

use std::sync::Arc;

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use filemaker_bridge::FileMakerBridge;

/// Create a combined router for all bridge endpoints
///
/// Mount the result under [`FMB_ROUTE_PREFIX`](crate::FMB_ROUTE_PREFIX) so the
/// OAuth return URL handed to FileMaker resolves to this router's callback.
/// The endpoints will be available at:
/// - {FMB_ROUTE_PREFIX}/login and {FMB_ROUTE_PREFIX}/magic-link
/// - {FMB_ROUTE_PREFIX}/oauth/...
/// - {FMB_ROUTE_PREFIX}/session/health
pub fn filemaker_bridge_router(bridge: Arc<FileMakerBridge>) -> Router {
    filemaker_bridge_router_no_trace(bridge).layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as `filemaker_bridge_router()` without the HTTP tracing middleware.
pub fn filemaker_bridge_router_no_trace(bridge: Arc<FileMakerBridge>) -> Router {
    Router::new()
        .merge(super::login::router())
        .nest("/oauth", super::oauth::router())
        .nest("/session", super::session::router())
        .with_state(bridge)
}
