use crate::oauth::types::{CorrelationEntry, ExchangeFailure, ExchangeOutcome};
use crate::utils::mask_token;

use super::core::OAuthBridge;

const MISSING_PARAMETERS: &str = "createFileMakerSession missing parameters";

const UNAUTHORIZED_SUGGESTIONS: [&str; 4] = [
    "The authorization code may have expired",
    "The OAuth provider may not be properly configured",
    "The request ID may not match the OAuth session",
    "Try completing the OAuth flow again",
];

impl OAuthBridge {
    /// Redeem a completed handshake for a Data API access token.
    ///
    /// Failures are returned as [`ExchangeOutcome::Failure`], never raised,
    /// so the HTTP layer can turn them into an error redirect.
    pub async fn exchange_for_filemaker_session(&self, entry: &CorrelationEntry) -> ExchangeOutcome {
        let (Some(identifier), Some(request_id)) = (
            entry.identifier.as_deref().filter(|s| !s.is_empty()),
            entry.request_id.as_deref().filter(|s| !s.is_empty()),
        ) else {
            tracing::warn!(
                "OAuth session {}: {}",
                entry.tracking_id,
                MISSING_PARAMETERS
            );
            return ExchangeOutcome::failure(MISSING_PARAMETERS);
        };

        tracing::debug!(
            "Authenticating with FileMaker using identifier: {}",
            mask_token(identifier)
        );
        let response = match self.client.post_oauth_session(request_id, identifier).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error proxying OAuth database login: {}", e);
                return ExchangeOutcome::failure(e.to_string());
            }
        };

        if !response.is_success() {
            tracing::error!(
                "FileMaker OAuth database login failed: {} {}",
                response.status,
                response.body
            );
            if response.status == 401 {
                if let Some(message) = response.first_message() {
                    return ExchangeOutcome::Failure(ExchangeFailure {
                        error: format!(
                            "OAuth authentication failed: {} (Code: {})",
                            message.message, message.code
                        ),
                        code: Some(message.code),
                        suggestions: UNAUTHORIZED_SUGGESTIONS
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                        details: Some(response.body),
                        ..Default::default()
                    });
                }
            }
            return ExchangeOutcome::Failure(ExchangeFailure {
                error: format!("Database login failed: {}", response.status),
                details: Some(response.body),
                headers: response.headers,
                ..Default::default()
            });
        }

        match response.access_token {
            Some(access_token) if !access_token.is_empty() => {
                tracing::info!(
                    "FileMaker OAuth session created for {}",
                    entry.tracking_id
                );
                ExchangeOutcome::Success {
                    access_token,
                    response: response.body,
                }
            }
            _ => {
                tracing::error!("No access token received from FileMaker");
                ExchangeOutcome::Failure(ExchangeFailure {
                    error: "No access token received from FileMaker".to_string(),
                    details: Some(response.body),
                    headers: response.headers,
                    ..Default::default()
                })
            }
        }
    }
}
