use crate::bridge::FileMakerBridge;
use crate::client::CredentialRole;
use crate::identity::IdentityRecord;

use super::auth_script::call_auth_script;
use super::errors::CoordinationError;

/// Username/password login.
///
/// Creates a short-lived auth-role session, runs the authentication script
/// with it and always revokes it afterwards. Every failure, whether bad
/// credentials or an unreachable server, surfaces as
/// [`CoordinationError::Unauthorized`]; the cause is only logged.
pub async fn authenticate_user(
    bridge: &FileMakerBridge,
    username: &str,
    password: &str,
) -> Result<IdentityRecord, CoordinationError> {
    tracing::info!("FileMaker auth attempt: {}", username);

    match login(bridge, username, password).await {
        Ok(identity) => {
            tracing::info!("FileMaker authentication successful for: {}", username);
            Ok(identity)
        }
        Err(e) => {
            tracing::warn!("FileMaker authentication failed for {}: {}", username, e);
            Err(CoordinationError::Unauthorized)
        }
    }
}

async fn login(
    bridge: &FileMakerBridge,
    username: &str,
    password: &str,
) -> Result<IdentityRecord, CoordinationError> {
    let token = bridge.sessions().create_session(CredentialRole::Auth).await?;

    let credential = call_auth_script(bridge, &token, Some(username), Some(password), false).await;
    if !bridge.sessions().revoke_session(&token).await {
        tracing::warn!("Failed to revoke FileMaker auth session after login");
    }

    bridge
        .translator()
        .translate(&credential?)
        .ok_or_else(|| CoordinationError::Authentication("credential rejected".to_string()))
}
