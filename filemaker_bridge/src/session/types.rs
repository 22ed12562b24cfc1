use serde::Serialize;
use tokio::time::Instant;

use crate::config::SessionPolicy;
use crate::session::errors::SessionError;
use crate::utils::mask_token;

/// The one cached Data API session.
#[derive(Debug, Clone)]
pub(super) struct SessionRecord {
    pub(super) token: String,
    pub(super) expires_at: Instant,
    pub(super) last_health_check_at: Instant,
}

impl SessionRecord {
    pub(super) fn new(token: String, policy: &SessionPolicy) -> Self {
        let now = Instant::now();
        Self {
            token,
            expires_at: now + policy.lifetime,
            last_health_check_at: now,
        }
    }

    pub(super) fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub(super) fn needs_health_check(&self, now: Instant, policy: &SessionPolicy) -> bool {
        now.duration_since(self.last_health_check_at) > policy.health_check_interval
    }
}

/// State guarded by the manager's mutex.
///
/// `last_failure` keeps the outcome of the most recent failed creation,
/// tagged with its sequence number, so callers that queued up behind that
/// creation report it instead of starting their own.
#[derive(Debug, Default)]
pub(super) struct SessionSlot {
    pub(super) record: Option<SessionRecord>,
    pub(super) last_failure: Option<(u64, SessionError)>,
}

/// Diagnostic view of the cached session
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub token_preview: String,
    pub expires_in_secs: u64,
    pub secs_since_health_check: u64,
}

impl SessionInfo {
    pub(super) fn from_record(record: &SessionRecord, now: Instant) -> Self {
        Self {
            token_preview: mask_token(&record.token),
            expires_in_secs: record.expires_at.saturating_duration_since(now).as_secs(),
            secs_since_health_check: now.duration_since(record.last_health_check_at).as_secs(),
        }
    }
}
