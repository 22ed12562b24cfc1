use serde::Deserialize;
use serde_json::json;

use crate::bridge::FileMakerBridge;
use crate::client::ClientError;
use crate::utils::gen_call_id;

use super::errors::CoordinationError;

/// Field of the request layout the authentication script writes its result to.
const AUTH_RESULT_FIELD: &str = "d__OutputResult_JSON";

/// JSON stored in [`AUTH_RESULT_FIELD`]: `message` holds the signed
/// credential on success and a plain explanation otherwise.
#[derive(Debug, Deserialize)]
struct AuthScriptOutput {
    message: String,
}

/// Run the authentication script as the pre-request script of a `_find`
/// keyed by a fresh call id, and return the credential it produced.
///
/// `token` is used as-is; the caller owns its revocation.
pub(super) async fn call_auth_script(
    bridge: &FileMakerBridge,
    token: &str,
    username: Option<&str>,
    password: Option<&str>,
    oauth_process: bool,
) -> Result<String, CoordinationError> {
    let config = bridge.config();
    let call_id = gen_call_id();
    let param = json!({
        "username": username,
        "password": password,
        "a_sk_Call_id": call_id,
        "oauthProcess": oauth_process,
    })
    .to_string();

    tracing::debug!(
        "Calling {} on layout {} (call id {})",
        config.auth_script,
        config.auth_layout,
        call_id
    );
    let found = bridge
        .client()
        .find_with_prerequest_script(
            token,
            &config.auth_layout,
            json!([{ "a_sk_Call_id": call_id }]),
            &config.auth_script,
            param,
        )
        .await?;

    let raw = found.first_field(AUTH_RESULT_FIELD)?;
    let output: AuthScriptOutput = serde_json::from_str(raw).map_err(ClientError::from)?;
    Ok(output.message)
}
