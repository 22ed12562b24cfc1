use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthStatus {
    Pending,
    Completed,
    Error,
}

impl OAuthStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// State of one OAuth handshake, keyed by its tracking id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationEntry {
    pub tracking_id: String,
    pub host: String,
    pub provider: String,
    pub status: OAuthStatus,
    pub oauth_url: Option<String>,
    pub request_id: Option<String>,
    pub identifier: Option<String>,
    pub hidden_email: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) started: Instant,
}

impl CorrelationEntry {
    pub(crate) fn pending(tracking_id: String, host: &str, provider: &str) -> Self {
        Self {
            tracking_id,
            host: host.to_string(),
            provider: provider.to_string(),
            status: OAuthStatus::Pending,
            oauth_url: None,
            request_id: None,
            identifier: None,
            hidden_email: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
            started: Instant::now(),
        }
    }

    /// Pending for longer than `ttl`. Terminal entries never expire.
    pub(crate) fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.status == OAuthStatus::Pending && now.duration_since(self.started) > ttl
    }
}

/// Query parameters FileMaker appends when redirecting back to the app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCompletion {
    pub identifier: Option<String>,
    #[serde(rename = "hiddenemail")]
    pub hidden_email: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateResponse {
    pub tracking_id: String,
    pub oauth_url: String,
    pub request_id: Option<String>,
}

/// Result of redeeming a completed handshake for a Data API token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExchangeOutcome {
    Success {
        #[serde(rename = "accessToken")]
        access_token: String,
        response: Value,
    },
    Failure(ExchangeFailure),
}

impl ExchangeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub(crate) fn failure(error: impl Into<String>) -> Self {
        Self::Failure(ExchangeFailure {
            error: error.into(),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExchangeFailure {
    /// Human-readable reason
    pub error: String,
    /// FileMaker message code, when the server supplied one
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// Response body echoed for diagnosis
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}
