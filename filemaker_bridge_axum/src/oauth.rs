use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use filemaker_bridge::{
    CoordinationError, CorrelationEntry, FileMakerBridge, OAuthCallbackParams, ProviderList,
    handle_oauth_callback,
};

use super::config::FMB_DEFAULT_OAUTH_PROVIDER;
use super::error::IntoResponseError;

pub(super) fn router() -> Router<Arc<FileMakerBridge>> {
    Router::new()
        .route("/providers", get(providers))
        .route("/initiate", get(initiate))
        .route("/status/{tracking_id}", get(status))
        .route("/sessions", get(sessions))
        .route("/callback", get(callback))
}

#[derive(Debug, Deserialize)]
struct InitiateQuery {
    provider: Option<String>,
    #[serde(default)]
    redirect: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    tracking_id: String,
    /// False while FileMaker has not called back yet
    completed: bool,
    session: Option<CorrelationEntry>,
}

#[derive(Debug, Serialize)]
struct SessionsResponse {
    count: usize,
    sessions: Vec<CorrelationEntry>,
}

async fn providers(
    State(bridge): State<Arc<FileMakerBridge>>,
) -> Result<Json<ProviderList>, (StatusCode, String)> {
    bridge
        .oauth()
        .get_providers(&bridge.config().oauth_host)
        .await
        .map(Json)
        .into_response_error()
}

/// Starts a login; `redirect=true` sends the browser straight to the provider.
async fn initiate(
    State(bridge): State<Arc<FileMakerBridge>>,
    Query(query): Query<InitiateQuery>,
) -> Result<Response, (StatusCode, String)> {
    let provider = query
        .provider
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| FMB_DEFAULT_OAUTH_PROVIDER.to_string());

    let init = bridge
        .oauth()
        .initiate(&bridge.config().oauth_host, &provider)
        .await
        .into_response_error()?;

    if query.redirect {
        Ok(Redirect::to(&init.oauth_url).into_response())
    } else {
        Ok(Json(init).into_response())
    }
}

async fn status(
    State(bridge): State<Arc<FileMakerBridge>>,
    Path(tracking_id): Path<String>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    let session = bridge
        .oauth()
        .check_status(&tracking_id)
        .await
        .into_response_error()?;

    Ok(Json(StatusResponse {
        tracking_id,
        completed: session.is_some(),
        session,
    }))
}

/// Diagnostic listing of every correlation entry, including provider
/// identifiers and user e-mail addresses.
///
/// The route carries no access guard of its own; embedders must keep it off
/// public listeners or wrap it in their own authorization layer.
async fn sessions(State(bridge): State<Arc<FileMakerBridge>>) -> Json<SessionsResponse> {
    let sessions = bridge.oauth().sessions().await;
    Json(SessionsResponse {
        count: sessions.len(),
        sessions,
    })
}

/// FileMaker's redirect target. Always answers with a redirect to the
/// application's success or error page.
async fn callback(
    State(bridge): State<Arc<FileMakerBridge>>,
    Query(params): Query<OAuthCallbackParams>,
) -> Redirect {
    let config = bridge.config();
    match handle_oauth_callback(&bridge, &params).await {
        Ok(identity) => match serde_json::to_string(&identity) {
            Ok(user) => Redirect::to(&format!(
                "{}?user={}",
                config.oauth_success_url(),
                urlencoding::encode(&user)
            )),
            Err(e) => error_redirect(&config.oauth_error_url(), "callback_failed", &e.to_string()),
        },
        Err(CoordinationError::Callback { code, description }) => {
            error_redirect(&config.oauth_error_url(), &code, &description)
        }
        Err(e) => error_redirect(&config.oauth_error_url(), "callback_failed", &e.to_string()),
    }
}

fn error_redirect(error_url: &str, code: &str, description: &str) -> Redirect {
    Redirect::to(&format!(
        "{}?error={}&description={}",
        error_url,
        urlencoding::encode(code),
        urlencoding::encode(description)
    ))
}
