use async_trait::async_trait;

use crate::client::{ClientError, CredentialRole, FileMakerClient};
use crate::utils::mask_token;

/// Data API operations the session manager depends on.
#[async_trait]
pub trait SessionBackend: Send + Sync + 'static {
    /// Log in with the credentials of `role` and return the new token.
    async fn create_session(&self, role: CredentialRole) -> Result<String, ClientError>;

    /// Liveness probe. Any failure reads as "not alive".
    async fn validate_session(&self, token: &str) -> bool;

    /// Log the token out. Any failure reads as "not revoked".
    async fn revoke_session(&self, token: &str) -> bool;
}

#[async_trait]
impl SessionBackend for FileMakerClient {
    async fn create_session(&self, role: CredentialRole) -> Result<String, ClientError> {
        self.post_session(role).await
    }

    async fn validate_session(&self, token: &str) -> bool {
        match self.get_session_status(token).await {
            Ok(alive) => alive,
            Err(e) => {
                tracing::warn!("Validation of session {} failed: {}", mask_token(token), e);
                false
            }
        }
    }

    async fn revoke_session(&self, token: &str) -> bool {
        match self.delete_session(token).await {
            Ok(true) => {
                tracing::debug!("FileMaker session {} revoked", mask_token(token));
                true
            }
            Ok(false) => {
                tracing::debug!("FileMaker refused to revoke session {}", mask_token(token));
                false
            }
            Err(e) => {
                tracing::warn!("Revocation of session {} failed: {}", mask_token(token), e);
                false
            }
        }
    }
}
