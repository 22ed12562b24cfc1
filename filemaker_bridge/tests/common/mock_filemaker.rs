//! Axum-based mock FileMaker Server
//!
//! Each test starts its own instance on an ephemeral port, so tests never
//! share state. Implements just enough of the Data API and the OAuth proxy
//! endpoints for the bridge: session login/validate/logout, the OAuth
//! session exchange, `_find` with the authentication pre-request script,
//! record creation with a script, provider discovery and OAuth URL
//! initiation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

use super::fixtures::{
    AUTH_BASIC, DATA_BASIC, OAUTH_ACCESS_TOKEN, TEST_JWT_SECRET, VALID_PASSWORD, VALID_USERNAME,
    sign,
};

#[derive(Clone, Default)]
pub struct MockState {
    pub live_tokens: Arc<Mutex<HashSet<String>>>,
    pub revoked: Arc<Mutex<Vec<String>>>,
    pub find_params: Arc<Mutex<Vec<Value>>>,
    pub return_urls: Arc<Mutex<Vec<String>>>,
    pub session_creates: Arc<AtomicUsize>,
    pub oauth_exchanges: Arc<AtomicUsize>,
    pub record_calls: Arc<AtomicUsize>,
    /// Fail this many basic-auth logins with a 500 before succeeding
    pub fail_creates: Arc<AtomicUsize>,
    /// Make the OAuth URL endpoint answer 500
    pub fail_oauth_url: Arc<AtomicBool>,
    counter: Arc<AtomicUsize>,
}

impl MockState {
    fn issue(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("{prefix}-token-{n}");
        self.live_tokens.lock().unwrap().insert(token.clone());
        token
    }

    fn is_live(&self, token: &str) -> bool {
        self.live_tokens.lock().unwrap().contains(token)
    }

    /// Drop every live token, as a server restart would.
    pub fn expire_all(&self) {
        self.live_tokens.lock().unwrap().clear();
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

pub struct MockFileMaker {
    pub base_url: String,
    pub host: String,
    pub state: MockState,
}

impl MockFileMaker {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/fmi/data/{version}/databases/{db}/sessions", post(create_session))
            .route(
                "/fmi/data/{version}/databases/{db}/sessions/{token}",
                get(validate_session).delete(delete_session),
            )
            .route(
                "/fmi/data/{version}/databases/{db}/layouts/{layout}/_find",
                post(find_records),
            )
            .route(
                "/fmi/data/{version}/databases/{db}/layouts/{layout}/records",
                post(create_record),
            )
            .route("/fmws/oauthproviderinfo", get(provider_info))
            .route("/oauth/getoauthurl", get(oauth_url))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            host: addr.to_string(),
            state,
        }
    }
}

fn fm_error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "response": {}, "messages": [{ "code": code, "message": message }] })),
    )
        .into_response()
}

fn invalid_token() -> Response {
    fm_error(
        StatusCode::UNAUTHORIZED,
        "952",
        "Invalid FileMaker Data API token (*)",
    )
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn ok(response: Value) -> Response {
    Json(json!({ "response": response, "messages": [{ "code": "0", "message": "OK" }] }))
        .into_response()
}

async fn create_session(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Some(identifier) = headers.get("x-fm-data-oauth-identifier") {
        state.oauth_exchanges.fetch_add(1, Ordering::SeqCst);
        let request_id = headers.get("x-fm-data-oauth-request-id");
        return match (identifier.to_str().unwrap_or_default(), request_id) {
            (_, None) => fm_error(StatusCode::BAD_REQUEST, "10", "Missing request id"),
            ("expired-code", _) => fm_error(
                StatusCode::UNAUTHORIZED,
                "212",
                "Invalid user account and/or password; please try again",
            ),
            ("no-token", _) => ok(json!({})),
            _ => {
                state
                    .live_tokens
                    .lock()
                    .unwrap()
                    .insert(OAUTH_ACCESS_TOKEN.to_string());
                (
                    [("X-FM-Data-Access-Token", OAUTH_ACCESS_TOKEN)],
                    ok(json!({ "token": OAUTH_ACCESS_TOKEN })),
                )
                    .into_response()
            }
        };
    }

    state.session_creates.fetch_add(1, Ordering::SeqCst);
    let failing = state
        .fail_creates
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return fm_error(StatusCode::INTERNAL_SERVER_ERROR, "802", "Unable to open file");
    }

    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    match authorization.strip_prefix("Basic ") {
        Some(DATA_BASIC) => ok(json!({ "token": state.issue("data") })),
        Some(AUTH_BASIC) => ok(json!({ "token": state.issue("auth") })),
        _ => fm_error(
            StatusCode::UNAUTHORIZED,
            "212",
            "Invalid user account and/or password; please try again",
        ),
    }
}

async fn validate_session(
    State(state): State<MockState>,
    Path((_version, _db, token)): Path<(String, String, String)>,
) -> Response {
    if state.is_live(&token) {
        ok(json!({}))
    } else {
        invalid_token()
    }
}

async fn delete_session(
    State(state): State<MockState>,
    Path((_version, _db, token)): Path<(String, String, String)>,
) -> Response {
    state.revoked.lock().unwrap().push(token.clone());
    if state.live_tokens.lock().unwrap().remove(&token) {
        ok(json!({}))
    } else {
        invalid_token()
    }
}

async fn find_records(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match bearer(&headers) {
        Some(token) if state.is_live(&token) => {}
        _ => return invalid_token(),
    }

    let param: Value = body["script.prerequest.param"]
        .as_str()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(Value::Null);
    state.find_params.lock().unwrap().push(param.clone());

    let call_id = &body["query"][0]["a_sk_Call_id"];
    if call_id.is_null() || *call_id != param["a_sk_Call_id"] {
        return fm_error(StatusCode::INTERNAL_SERVER_ERROR, "401", "No records match the request");
    }

    let message = if param["oauthProcess"] == json!(true) {
        sign(
            &json!({ "user": "oauth.user", "privilegeSet": "[Data Entry Only]" }),
            TEST_JWT_SECRET,
        )
    } else if param["username"] == VALID_USERNAME && param["password"] == VALID_PASSWORD {
        sign(
            &json!({ "id": 7, "user": VALID_USERNAME, "privilegeSet": "[Full Access]" }),
            TEST_JWT_SECRET,
        )
    } else {
        "Unable to login".to_string()
    };

    ok(json!({
        "data": [{
            "fieldData": {
                "d__OutputResult_JSON": json!({ "message": message }).to_string()
            },
            "recordId": "1"
        }]
    }))
}

async fn create_record(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record_calls.fetch_add(1, Ordering::SeqCst);
    match bearer(&headers) {
        Some(token) if state.is_live(&token) => {}
        _ => return invalid_token(),
    }

    if body["script"] == "FailingScript" {
        return ok(json!({ "recordId": "2", "scriptError": "104" }));
    }

    let result = json!({
        "ok": true,
        "param": body["script.param"],
        "fields": body["fieldData"],
    });
    ok(json!({
        "recordId": "2",
        "scriptResult": result.to_string(),
        "scriptError": "0"
    }))
}

async fn provider_info(headers: HeaderMap) -> Response {
    if headers
        .get("x-fms-application-type")
        .and_then(|v| v.to_str().ok())
        != Some("9")
    {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(json!({
        "data": {
            "Provider": [
                { "Name": "Microsoft", "Enabled": true },
                { "Name": "Google", "Enabled": false }
            ]
        }
    }))
    .into_response()
}

async fn oauth_url(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if state.fail_oauth_url.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "provider unavailable").into_response();
    }
    let (Some(tracking_id), Some(provider)) = (query.get("trackingID"), query.get("provider"))
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if query.get("X-FMS-OAuth-AuthType").map(String::as_str) != Some("2") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if let Some(return_url) = headers.get("x-fms-return-url").and_then(|v| v.to_str().ok()) {
        state.return_urls.lock().unwrap().push(return_url.to_string());
    }

    let request_id = format!("req-{tracking_id}");
    (
        [("X-FMS-Request-ID", request_id)],
        format!("https://login.example.com/{provider}/authorize?state={tracking_id}\n"),
    )
        .into_response()
}
