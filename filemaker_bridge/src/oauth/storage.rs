use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::errors::OAuthError;
use super::types::CorrelationEntry;

/// In-process correlation table.
///
/// Entries live for the lifetime of the process; the only eviction is the
/// lazy removal of pending entries that outlived their time-to-live. A
/// callback landing on a different process than its initiation will not
/// find its entry.
#[derive(Default)]
pub(crate) struct CorrelationTable {
    entries: Mutex<HashMap<String, CorrelationEntry>>,
}

impl CorrelationTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn insert(&self, entry: CorrelationEntry) {
        self.entries
            .lock()
            .await
            .insert(entry.tracking_id.clone(), entry);
    }

    pub(crate) async fn remove(&self, tracking_id: &str) -> Option<CorrelationEntry> {
        self.entries.lock().await.remove(tracking_id)
    }

    /// Run `f` on the entry if it exists and has not expired.
    ///
    /// An expired pending entry is evicted, so later lookups of the same id
    /// report `SessionNotFound`.
    pub(crate) async fn with_live_entry<R>(
        &self,
        tracking_id: &str,
        ttl: Duration,
        f: impl FnOnce(&mut CorrelationEntry) -> R,
    ) -> Result<R, OAuthError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .get_mut(tracking_id)
            .ok_or(OAuthError::SessionNotFound)?;

        if entry.is_expired(Instant::now(), ttl) {
            entries.remove(tracking_id);
            tracing::warn!("OAuth session {} expired while pending", tracking_id);
            return Err(OAuthError::SessionExpired);
        }

        Ok(f(entry))
    }

    /// All entries, oldest first.
    pub(crate) async fn list(&self) -> Vec<CorrelationEntry> {
        let mut entries: Vec<_> = self.entries.lock().await.values().cloned().collect();
        entries.sort_by_key(|e| e.started);
        entries
    }
}
