//! Error types for the login flows

use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::oauth::OAuthError;
use crate::session::SessionError;

/// Errors that can occur while coordinating a login or data call
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Login denied; the cause is logged, never exposed
    #[error("Unauthorized access")]
    Unauthorized,

    /// Authentication could not be completed
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// OAuth callback failure with a machine-readable code for the error page
    #[error("OAuth callback failed ({code}): {description}")]
    Callback { code: String, description: String },

    /// Malformed input from the caller
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(ConfigError),

    #[error("Client error: {0}")]
    ClientError(ClientError),

    #[error("Session error: {0}")]
    SessionError(SessionError),

    #[error("OAuth error: {0}")]
    OAuthError(OAuthError),
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Unauthorized => tracing::warn!("Unauthorized access"),
            Self::Authentication(msg) => tracing::error!("Authentication error: {}", msg),
            Self::Callback { code, description } => {
                tracing::error!("OAuth callback failed ({}): {}", code, description)
            }
            Self::InvalidRequest(msg) => tracing::warn!("Invalid request: {}", msg),
            Self::ConfigError(err) => tracing::error!("Configuration error: {}", err),
            Self::ClientError(err) => tracing::error!("Client error: {}", err),
            Self::SessionError(err) => tracing::error!("Session error: {}", err),
            Self::OAuthError(err) => tracing::error!("OAuth error: {}", err),
        }
        self
    }

    pub(crate) fn callback(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Callback {
            code: code.into(),
            description: description.into(),
        }
    }
}

// From implementations log on conversion

impl From<ConfigError> for CoordinationError {
    fn from(err: ConfigError) -> Self {
        let error = Self::ConfigError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<ClientError> for CoordinationError {
    fn from(err: ClientError) -> Self {
        let error = Self::ClientError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<SessionError> for CoordinationError {
    fn from(err: SessionError) -> Self {
        let error = Self::SessionError(err);
        tracing::error!("{}", error);
        error
    }
}

impl From<OAuthError> for CoordinationError {
    fn from(err: OAuthError) -> Self {
        let error = Self::OAuthError(err);
        tracing::error!("{}", error);
        error
    }
}
