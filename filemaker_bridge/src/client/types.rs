use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ClientError;

/// FileMaker's message code for success.
pub(crate) const SUCCESS_CODE: &str = "0";

/// Which credential pair a Data API session is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialRole {
    /// Long-lived shared session used for data access
    Data,
    /// Short-lived session used only to run the authentication script
    Auth,
}

impl CredentialRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Auth => "auth",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FmMessage {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Standard Data API response wrapper: `{ "response": {...}, "messages": [...] }`
#[derive(Debug, Deserialize)]
pub(crate) struct FmEnvelope<T> {
    pub(crate) response: Option<T>,
    #[serde(default)]
    pub(crate) messages: Vec<FmMessage>,
}

impl<T> FmEnvelope<T> {
    /// Fail on the first message whose code is not the success sentinel.
    pub(crate) fn into_checked(self) -> Result<T, ClientError> {
        if let Some(msg) = self.messages.iter().find(|m| m.code != SUCCESS_CODE) {
            return Err(ClientError::FileMaker {
                code: msg.code.clone(),
                message: msg.message.clone(),
            });
        }
        self.response
            .ok_or_else(|| ClientError::Missing("response".to_string()))
    }
}

/// Body of FileMaker error responses; only the messages are of interest.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FmErrorBody {
    #[serde(default)]
    pub(crate) messages: Vec<FmMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindResponse {
    #[serde(default)]
    pub(crate) data: Vec<FindRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindRecord {
    #[serde(rename = "fieldData")]
    pub(crate) field_data: serde_json::Map<String, Value>,
}

impl FindResponse {
    /// Read a text field of the first returned record.
    pub(crate) fn first_field(&self, field: &str) -> Result<&str, ClientError> {
        let record = self
            .data
            .first()
            .ok_or_else(|| ClientError::Missing("data[0]".to_string()))?;
        record
            .field_data
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::Missing(format!("fieldData.{field}")))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScriptRecordResponse {
    #[serde(rename = "scriptResult")]
    pub(crate) script_result: Option<String>,
    #[serde(rename = "scriptError")]
    pub(crate) script_error: Option<String>,
}

/// Raw result of the OAuth login request, interpreted by the OAuth bridge.
#[derive(Debug, Clone)]
pub(crate) struct ExchangeResponse {
    pub(crate) status: u16,
    pub(crate) access_token: Option<String>,
    pub(crate) body: Value,
    pub(crate) headers: BTreeMap<String, String>,
}

impl ExchangeResponse {
    pub(crate) fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First FileMaker message in the body, if the body carries any.
    pub(crate) fn first_message(&self) -> Option<FmMessage> {
        serde_json::from_value::<FmErrorBody>(self.body.clone())
            .ok()
            .and_then(|body| body.messages.into_iter().next())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OAuthUrlResponse {
    pub(crate) oauth_url: String,
    pub(crate) request_id: Option<String>,
}

/// Identity providers advertised by FileMaker Server, passed through as
/// returned by `/fmws/oauthproviderinfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderList(pub Value);
