use http::StatusCode;

use filemaker_bridge::{CoordinationError, OAuthError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Maps CoordinationError variants to status codes
///
/// Upstream failures (FileMaker unreachable, session creation exhausted) are
/// reported as 502 since the bridge itself is healthy.
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match &e {
                CoordinationError::Unauthorized => StatusCode::UNAUTHORIZED,
                CoordinationError::Authentication(_) => StatusCode::UNAUTHORIZED,
                CoordinationError::Callback { .. } => StatusCode::BAD_REQUEST,
                CoordinationError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                CoordinationError::OAuthError(OAuthError::SessionNotFound) => {
                    StatusCode::NOT_FOUND
                }
                CoordinationError::OAuthError(OAuthError::SessionExpired) => StatusCode::GONE,
                CoordinationError::OAuthError(OAuthError::Client(_)) => StatusCode::BAD_GATEWAY,
                CoordinationError::ClientError(_) => StatusCode::BAD_GATEWAY,
                CoordinationError::SessionError(_) => StatusCode::BAD_GATEWAY,
                CoordinationError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// OAuth bridge calls go through the same table after conversion
impl<T> IntoResponseError<T> for Result<T, OAuthError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(CoordinationError::from).into_response_error()
    }
}
