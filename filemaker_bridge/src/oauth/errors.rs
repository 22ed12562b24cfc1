use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    /// No correlation entry exists for the tracking id
    #[error("OAuth session not found")]
    SessionNotFound,

    /// The entry stayed pending past its time-to-live and was evicted
    #[error("OAuth session expired")]
    SessionExpired,

    #[error("FileMaker request failed: {0}")]
    Client(#[from] ClientError),
}
