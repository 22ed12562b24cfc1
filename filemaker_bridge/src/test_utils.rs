//! Test utilities shared by the unit tests of this crate
//!
//! Provides an in-memory [`SessionBackend`] with call counters and
//! configurable failures, a config builder that never touches the process
//! environment, and a helper for minting FileMaker-style signed credentials.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{ClientError, CredentialRole};
use crate::config::BridgeConfig;
use crate::session::SessionBackend;

pub(crate) const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// In-memory session backend.
///
/// Tokens are `token-<n>` where `n` counts creation calls. `valid` drives
/// both validation and revocation results.
pub(crate) struct FakeBackend {
    pub(crate) create_calls: AtomicUsize,
    pub(crate) validate_calls: AtomicUsize,
    pub(crate) fail_remaining: AtomicUsize,
    pub(crate) valid: AtomicBool,
    create_delay: Duration,
    roles: Mutex<Vec<CredentialRole>>,
    revoked: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            create_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            fail_remaining: AtomicUsize::new(0),
            valid: AtomicBool::new(true),
            create_delay: Duration::ZERO,
            roles: Mutex::new(Vec::new()),
            revoked: Mutex::new(Vec::new()),
        }
    }

    /// Fail the next `count` creation calls.
    pub(crate) fn failing_first(self, count: usize) -> Self {
        self.fail_remaining.store(count, Ordering::SeqCst);
        self
    }

    pub(crate) fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = delay;
        self
    }

    pub(crate) fn roles(&self) -> Vec<CredentialRole> {
        self.roles.lock().unwrap().clone()
    }

    pub(crate) fn revoked_tokens(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionBackend for FakeBackend {
    async fn create_session(&self, role: CredentialRole) -> Result<String, ClientError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.roles.lock().unwrap().push(role);
        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }

        let should_fail = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                (left > 0).then(|| left.saturating_sub(1))
            })
            .is_ok();
        if should_fail {
            return Err(ClientError::Status {
                status: 500,
                body: "unavailable".to_string(),
            });
        }
        Ok(format!("token-{n}"))
    }

    async fn validate_session(&self, _token: &str) -> bool {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        self.valid.load(Ordering::SeqCst)
    }

    async fn revoke_session(&self, token: &str) -> bool {
        self.revoked.lock().unwrap().push(token.to_string());
        self.valid.load(Ordering::SeqCst)
    }
}

/// Configuration pointing at `server_url`, built without reading the
/// process environment.
pub(crate) fn test_config(server_url: &str) -> BridgeConfig {
    let env: HashMap<&str, String> = HashMap::from([
        ("FILEMAKER_SERVER", server_url.to_string()),
        ("FILEMAKER_OAUTH_SCHEME", "http".to_string()),
        ("FILEMAKER_DATABASE", "Bridge".to_string()),
        ("FILEMAKER_DATA_USERNAME", "data-user".to_string()),
        ("FILEMAKER_DATA_PASSWORD", "data-pass".to_string()),
        ("FILEMAKER_AUTH_USERNAME", "auth-user".to_string()),
        ("FILEMAKER_AUTH_PASSWORD", "auth-pass".to_string()),
        ("FILEMAKER_JWT_SECRET", TEST_JWT_SECRET.to_string()),
        ("FMB_APP_URL", "https://app.example.com".to_string()),
    ]);
    BridgeConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
}

/// HS256 credential over `claims`, signed with `secret`.
pub(crate) fn sign_credential(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
