use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::client::CredentialRole;
use crate::config::SessionPolicy;
use crate::session::errors::SessionError;
use crate::session::types::{SessionInfo, SessionRecord, SessionSlot};
use crate::utils::mask_token;

use super::backend::SessionBackend;

/// Owner of the shared Data API session.
///
/// The cached record sits behind an async mutex. Whoever holds the lock
/// performs expiry checks, health probes and creation, so at most one
/// creation cycle is in flight. Callers queued behind it reuse the token it
/// produced, or report its failure if it gave up.
pub struct SessionManager {
    backend: Arc<dyn SessionBackend>,
    policy: SessionPolicy,
    current: Mutex<SessionSlot>,
    /// Number of creation cycles that ended in failure
    failed_creations: AtomicU64,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn SessionBackend>, policy: SessionPolicy) -> Self {
        Self {
            backend,
            policy,
            current: Mutex::new(SessionSlot::default()),
            failed_creations: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Return a live data-role token, creating or renewing it when needed.
    pub async fn get_session(&self) -> Result<String, SessionError> {
        let failures_seen = self.failed_creations.load(Ordering::SeqCst);
        let mut slot = self.current.lock().await;
        let now = Instant::now();

        if let Some(record) = slot.record.as_mut() {
            if record.is_expired(now) {
                tracing::debug!("Cached FileMaker session expired, recreating");
                slot.record = None;
            } else if record.needs_health_check(now, &self.policy) {
                if self.backend.validate_session(&record.token).await {
                    record.last_health_check_at = Instant::now();
                    return Ok(record.token.clone());
                }
                tracing::warn!(
                    "Cached FileMaker session {} failed health check, recreating",
                    mask_token(&record.token)
                );
                slot.record = None;
            } else {
                return Ok(record.token.clone());
            }
        }

        // A creation cycle failed while this caller was queued
        if let Some((seq, err)) = &slot.last_failure {
            if *seq > failures_seen {
                tracing::debug!("Reporting failure of the creation this caller waited on");
                return Err(err.clone());
            }
        }

        match self.create_with_retry(CredentialRole::Data).await {
            Ok(token) => {
                slot.record = Some(SessionRecord::new(token.clone(), &self.policy));
                slot.last_failure = None;
                Ok(token)
            }
            Err(err) => {
                let seq = self.failed_creations.fetch_add(1, Ordering::SeqCst) + 1;
                slot.last_failure = Some((seq, err.clone()));
                Err(err)
            }
        }
    }

    /// Single login attempt for `role`. The token is not cached.
    pub async fn create_session(&self, role: CredentialRole) -> Result<String, SessionError> {
        Ok(self.backend.create_session(role).await?)
    }

    /// Log `token` out; failures are reported as `false`, never raised.
    pub async fn revoke_session(&self, token: &str) -> bool {
        self.backend.revoke_session(token).await
    }

    pub async fn validate_session(&self, token: &str) -> bool {
        self.backend.validate_session(token).await
    }

    /// Probe the cached token; on failure drop it so the next
    /// `get_session` creates a new one.
    pub async fn health_check(&self) -> bool {
        let mut slot = self.current.lock().await;
        let Some(record) = slot.record.as_mut() else {
            tracing::debug!("No cached FileMaker session to check");
            return false;
        };

        if self.backend.validate_session(&record.token).await {
            record.last_health_check_at = Instant::now();
            true
        } else {
            tracing::warn!(
                "FileMaker session {} is no longer valid",
                mask_token(&record.token)
            );
            slot.record = None;
            false
        }
    }

    /// Forget the cached token without probing it.
    pub async fn invalidate(&self) {
        if let Some(record) = self.current.lock().await.record.take() {
            tracing::debug!("Invalidated FileMaker session {}", mask_token(&record.token));
        }
    }

    pub async fn has_session(&self) -> bool {
        self.current.lock().await.record.is_some()
    }

    /// Remaining trusted lifetime of the cached token, `None` without one.
    pub async fn time_until_expiry(&self) -> Option<Duration> {
        self.current
            .lock()
            .await
            .record
            .as_ref()
            .map(|record| record.expires_at.saturating_duration_since(Instant::now()))
    }

    pub async fn info(&self) -> Option<SessionInfo> {
        self.current
            .lock()
            .await
            .record
            .as_ref()
            .map(|record| SessionInfo::from_record(record, Instant::now()))
    }

    async fn create_with_retry(&self, role: CredentialRole) -> Result<String, SessionError> {
        let attempts = self.policy.create_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.backend.create_session(role).await {
                Ok(token) => {
                    tracing::info!(
                        "FileMaker {} session created on attempt {}",
                        role.as_str(),
                        attempt
                    );
                    return Ok(token);
                }
                Err(e) if attempt < attempts => {
                    let backoff = self.policy.retry_backoff * attempt;
                    tracing::warn!(
                        "FileMaker session creation attempt {}/{} failed: {}; retrying in {:?}",
                        attempt,
                        attempts,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "FileMaker session creation failed after {} attempt(s): {}",
                        attempts,
                        e
                    );
                    return Err(SessionError::CreateFailed {
                        attempts,
                        source: e,
                    });
                }
            }
        }
    }
}
