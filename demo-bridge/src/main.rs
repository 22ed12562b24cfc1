use std::sync::Arc;

use axum::{Router, routing::get};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filemaker_bridge_axum::{FileMakerBridge, filemaker_bridge_router};

mod handlers;
mod server;

use crate::{handlers::index, server::serve};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,filemaker_bridge=debug,filemaker_bridge_axum=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bridge = Arc::new(FileMakerBridge::from_env()?);
    tracing::info!(
        "FileMaker bridge for database {} on {}",
        bridge.config().database,
        bridge.config().server_url
    );

    let route_prefix = bridge.config().route_prefix.clone();
    let app = Router::new()
        .route("/", get(index))
        .nest(&route_prefix, filemaker_bridge_router(bridge));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    serve(port, app).await?;
    Ok(())
}
