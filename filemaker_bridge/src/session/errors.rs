use thiserror::Error;

use crate::client::ClientError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Failed to create FileMaker session after {attempts} attempt(s): {source}")]
    CreateFailed { attempts: u32, source: ClientError },

    /// Error from a single Data API call
    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}
