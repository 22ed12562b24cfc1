use serde_json::Value;

use crate::bridge::FileMakerBridge;

use super::errors::CoordinationError;

/// Run `script` on `layout` through the shared data session.
///
/// A new request record carrying `field_data` is created and the script's
/// JSON result returned (`Value::Null` when it returns nothing). If
/// FileMaker rejects the cached token with a 401, the token is dropped and
/// the call is retried once with a fresh session.
pub async fn run_data_script(
    bridge: &FileMakerBridge,
    layout: &str,
    field_data: Value,
    script: &str,
    param: &str,
) -> Result<Value, CoordinationError> {
    let token = bridge.sessions().get_session().await?;
    let first = bridge
        .client()
        .run_record_script(&token, layout, field_data.clone(), script, param)
        .await;

    match first {
        Err(e) if e.is_unauthorized() => {
            tracing::warn!("FileMaker rejected the data session, recreating it");
            bridge.sessions().invalidate().await;
            let token = bridge.sessions().get_session().await?;
            Ok(bridge
                .client()
                .run_record_script(&token, layout, field_data, script, param)
                .await?)
        }
        result => Ok(result?),
    }
}
