use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use serde::Deserialize;

use filemaker_bridge::{FileMakerBridge, IdentityRecord, authenticate_user, login_with_magic_link};

use super::error::IntoResponseError;

pub(super) fn router() -> Router<Arc<FileMakerBridge>> {
    Router::new()
        .route("/login", post(login))
        .route("/magic-link", post(magic_link))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct MagicLinkRequest {
    #[serde(rename = "magicLink")]
    magic_link: String,
}

/// Accepts `application/x-www-form-urlencoded` or JSON bodies.
async fn login(
    State(bridge): State<Arc<FileMakerBridge>>,
    request: Request,
) -> Result<Json<IdentityRecord>, (StatusCode, String)> {
    let credentials = parse_login_request(request).await?;

    authenticate_user(&bridge, &credentials.username, &credentials.password)
        .await
        .map(Json)
        .into_response_error()
}

async fn magic_link(
    State(bridge): State<Arc<FileMakerBridge>>,
    Json(payload): Json<MagicLinkRequest>,
) -> Result<Json<IdentityRecord>, (StatusCode, String)> {
    login_with_magic_link(&bridge, &payload.magic_link)
        .map(Json)
        .into_response_error()
}

async fn parse_login_request(request: Request) -> Result<LoginRequest, (StatusCode, String)> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        Form::<LoginRequest>::from_request(request, &())
            .await
            .map(|Form(credentials)| credentials)
            .map_err(|e| (e.status(), e.body_text()))
    } else {
        Json::<LoginRequest>::from_request(request, &())
            .await
            .map(|Json(credentials)| credentials)
            .map_err(|e| (e.status(), e.body_text()))
    }
}
