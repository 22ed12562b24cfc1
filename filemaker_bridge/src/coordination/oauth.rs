use serde::{Deserialize, Serialize};

use crate::bridge::FileMakerBridge;
use crate::client::SUCCESS_CODE;
use crate::identity::IdentityRecord;
use crate::oauth::{ExchangeOutcome, OAuthCompletion};

use super::auth_script::call_auth_script;
use super::errors::CoordinationError;

pub const INVALID_CALLBACK: &str = "invalid_callback";
pub const CALLBACK_FAILED: &str = "callback_failed";
pub const SESSION_CREATION_FAILED: &str = "filemaker_session_creation_failed";

/// Query parameters of FileMaker's redirect back to the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthCallbackParams {
    #[serde(rename = "trackingID")]
    pub tracking_id: Option<String>,
    pub identifier: Option<String>,
    pub hiddenemail: Option<String>,
    pub error: Option<String>,
}

/// FileMaker reports success with the literal code `"0"`; anything else,
/// including an absent or empty code, is a failure.
pub fn is_success_code(code: Option<&str>) -> bool {
    code == Some(SUCCESS_CODE)
}

/// Finish an OAuth login from FileMaker's redirect parameters.
///
/// Correlates the redirect with its initiation, redeems it for a Data API
/// token, runs the authentication script with that token and translates the
/// resulting credential. Failures come back as
/// [`CoordinationError::Callback`] carrying the code for the error page:
/// the provider's own code, [`SESSION_CREATION_FAILED`], [`CALLBACK_FAILED`]
/// or [`INVALID_CALLBACK`].
pub async fn handle_oauth_callback(
    bridge: &FileMakerBridge,
    params: &OAuthCallbackParams,
) -> Result<IdentityRecord, CoordinationError> {
    let Some(tracking_id) = params.tracking_id.as_deref().filter(|s| !s.is_empty()) else {
        return Err(
            CoordinationError::callback(INVALID_CALLBACK, "missing trackingID parameter").log(),
        );
    };
    tracing::debug!("OAuth callback received for {}", tracking_id);

    if !is_success_code(params.error.as_deref()) {
        let code = params
            .error
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(INVALID_CALLBACK);
        if let Err(e) = bridge.oauth().fail(tracking_id, code).await {
            tracing::warn!("Could not mark OAuth session {} failed: {}", tracking_id, e);
        }
        return Err(CoordinationError::callback(code, "FileMaker OAuth error").log());
    }

    let completion = OAuthCompletion {
        identifier: params.identifier.clone(),
        hidden_email: params.hiddenemail.clone(),
        error: None,
    };
    let entry = bridge
        .oauth()
        .complete(tracking_id, completion)
        .await
        .map_err(|e| CoordinationError::callback(CALLBACK_FAILED, e.to_string()).log())?;

    let access_token = match bridge.oauth().exchange_for_filemaker_session(&entry).await {
        ExchangeOutcome::Success { access_token, .. } => access_token,
        ExchangeOutcome::Failure(failure) => {
            return Err(
                CoordinationError::callback(SESSION_CREATION_FAILED, failure.error).log(),
            );
        }
    };

    let credential = call_auth_script(bridge, &access_token, None, None, true).await;
    if !bridge.sessions().revoke_session(&access_token).await {
        tracing::warn!("Failed to revoke FileMaker OAuth session for {}", tracking_id);
    }

    let credential =
        credential.map_err(|e| CoordinationError::callback(CALLBACK_FAILED, e.to_string()).log())?;
    bridge.translator().translate(&credential).ok_or_else(|| {
        CoordinationError::callback(CALLBACK_FAILED, "FileMaker credential rejected").log()
    })
}
