use std::time::Duration;

use chrono::Utc;

use crate::client::{FileMakerClient, ProviderList};
use crate::oauth::errors::OAuthError;
use crate::oauth::storage::CorrelationTable;
use crate::oauth::types::{CorrelationEntry, InitiateResponse, OAuthCompletion, OAuthStatus};

/// Drives the FileMaker-proxied OAuth handshake.
///
/// Initiation and completion arrive on different requests; they are tied
/// together only by the tracking id generated here.
pub struct OAuthBridge {
    pub(super) client: FileMakerClient,
    table: CorrelationTable,
    pending_ttl: Duration,
    return_url: String,
}

impl OAuthBridge {
    pub fn new(client: FileMakerClient) -> Self {
        let config = client.config();
        let pending_ttl = config.oauth_pending_ttl;
        let return_url = config.oauth_return_url();
        Self {
            client,
            table: CorrelationTable::new(),
            pending_ttl,
            return_url,
        }
    }

    pub async fn get_providers(&self, host: &str) -> Result<ProviderList, OAuthError> {
        Ok(self.client.get_oauth_providers(host).await?)
    }

    /// Start a handshake with `provider` through the FileMaker server at `host`.
    ///
    /// The returned `oauth_url` is where the end user's browser must go next.
    pub async fn initiate(
        &self,
        host: &str,
        provider: &str,
    ) -> Result<InitiateResponse, OAuthError> {
        let tracking_id = uuid::Uuid::new_v4().to_string();
        self.table
            .insert(CorrelationEntry::pending(tracking_id.clone(), host, provider))
            .await;

        let response = match self
            .client
            .request_oauth_url(host, &tracking_id, provider, &self.return_url)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.table.remove(&tracking_id).await;
                tracing::error!("Error initiating OAuth with {}: {}", provider, e);
                return Err(e.into());
            }
        };

        let recorded = self
            .table
            .with_live_entry(&tracking_id, self.pending_ttl, |entry| {
                entry.oauth_url = Some(response.oauth_url.clone());
                entry.request_id = response.request_id.clone();
            })
            .await;
        if let Err(e) = recorded {
            tracing::warn!("OAuth session {} vanished during initiation", tracking_id);
            return Err(e);
        }

        tracing::info!(
            "OAuth flow initiated with {} (tracking id {})",
            provider,
            tracking_id
        );
        Ok(InitiateResponse {
            tracking_id,
            oauth_url: response.oauth_url,
            request_id: response.request_id,
        })
    }

    /// `Ok(None)` while the handshake is still pending; the entry once it
    /// reached a terminal state.
    pub async fn check_status(
        &self,
        tracking_id: &str,
    ) -> Result<Option<CorrelationEntry>, OAuthError> {
        self.table
            .with_live_entry(tracking_id, self.pending_ttl, |entry| {
                entry.status.is_terminal().then(|| entry.clone())
            })
            .await
    }

    /// Record the redirect parameters and move the entry to `completed`.
    ///
    /// An entry that already left `pending` is returned unchanged.
    pub async fn complete(
        &self,
        tracking_id: &str,
        completion: OAuthCompletion,
    ) -> Result<CorrelationEntry, OAuthError> {
        self.table
            .with_live_entry(tracking_id, self.pending_ttl, |entry| {
                if entry.status.is_terminal() {
                    tracing::warn!(
                        "OAuth session {} already {:?}, ignoring completion",
                        tracking_id,
                        entry.status
                    );
                    return entry.clone();
                }
                entry.status = OAuthStatus::Completed;
                entry.identifier = completion.identifier;
                entry.hidden_email = completion.hidden_email;
                entry.error = completion.error;
                entry.completed_at = Some(Utc::now());
                tracing::debug!("OAuth session {} completed", tracking_id);
                entry.clone()
            })
            .await
    }

    /// Move the entry to `error`, recording the provider's error code.
    pub async fn fail(
        &self,
        tracking_id: &str,
        error: &str,
    ) -> Result<CorrelationEntry, OAuthError> {
        self.table
            .with_live_entry(tracking_id, self.pending_ttl, |entry| {
                if !entry.status.is_terminal() {
                    entry.status = OAuthStatus::Error;
                    entry.error = Some(error.to_string());
                    entry.completed_at = Some(Utc::now());
                }
                entry.clone()
            })
            .await
    }

    /// Every correlation entry currently held, oldest first.
    pub async fn sessions(&self) -> Vec<CorrelationEntry> {
        self.table.list().await
    }

    /// Insert a pending entry as a successful initiation would have left it.
    #[cfg(test)]
    pub(crate) async fn seed_pending(&self, host: &str, provider: &str) -> String {
        let tracking_id = uuid::Uuid::new_v4().to_string();
        let mut entry = CorrelationEntry::pending(tracking_id.clone(), host, provider);
        entry.oauth_url = Some("https://login.example.com/authorize".to_string());
        entry.request_id = Some("req-1".to_string());
        self.table.insert(entry).await;
        tracking_id
    }
}
