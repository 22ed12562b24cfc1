use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::errors::ClientError;
use super::types::{
    CredentialRole, ExchangeResponse, FindResponse, FmEnvelope, ScriptRecordResponse,
    SUCCESS_CODE, TokenResponse,
};
use super::{FM_ACCESS_TOKEN_HEADER, FM_OAUTH_IDENTIFIER_HEADER, FM_OAUTH_REQUEST_ID_HEADER};
use super::FileMakerClient;
use crate::utils::mask_token;

impl FileMakerClient {
    fn sessions_url(&self) -> String {
        format!("{}/sessions", self.config.database_url())
    }

    fn layout_url(&self, layout: &str, action: &str) -> String {
        format!("{}/layouts/{}/{}", self.config.database_url(), layout, action)
    }

    /// `POST .../sessions` with basic auth for the given role.
    pub async fn post_session(&self, role: CredentialRole) -> Result<String, ClientError> {
        let credentials = match role {
            CredentialRole::Data => &self.config.data_credentials,
            CredentialRole::Auth => &self.config.auth_credentials,
        };

        tracing::debug!("Creating FileMaker {} session", role.as_str());
        let response = self
            .http
            .post(self.sessions_url())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&json!({}))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to create FileMaker {} session: {}",
                role.as_str(),
                status
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: FmEnvelope<TokenResponse> = response.json().await?;
        let token = envelope.into_checked()?.token;
        tracing::debug!(
            "FileMaker {} session created: {}",
            role.as_str(),
            mask_token(&token)
        );
        Ok(token)
    }

    /// `GET .../sessions/{token}`; only a 2xx counts as alive.
    pub async fn get_session_status(&self, token: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .get(format!("{}/{}", self.sessions_url(), token))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    /// `DELETE .../sessions/{token}`
    pub async fn delete_session(&self, token: &str) -> Result<bool, ClientError> {
        let response = self
            .http
            .delete(format!("{}/{}", self.sessions_url(), token))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    /// `POST .../layouts/{layout}/_find` running `script` as the pre-request
    /// script with `param` as its parameter.
    pub(crate) async fn find_with_prerequest_script(
        &self,
        token: &str,
        layout: &str,
        query: Value,
        script: &str,
        param: String,
    ) -> Result<FindResponse, ClientError> {
        let body = json!({
            "query": query,
            "script.prerequest": script,
            "script.prerequest.param": param,
        });

        let response = self
            .http
            .post(self.layout_url(layout, "_find"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: FmEnvelope<FindResponse> = response.json().await?;
        envelope.into_checked()
    }

    /// `POST .../layouts/{layout}/records` creating a request record and
    /// running `script` afterwards; returns the parsed `scriptResult`.
    pub(crate) async fn run_record_script(
        &self,
        token: &str,
        layout: &str,
        field_data: Value,
        script: &str,
        param: &str,
    ) -> Result<Value, ClientError> {
        let body = json!({
            "fieldData": field_data,
            "options": { "entrymode": "user", "prohibitmode": "user" },
            "script": script,
            "script.param": param,
        });

        let response = self
            .http
            .post(self.layout_url(layout, "records"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: FmEnvelope<ScriptRecordResponse> = response.json().await?;
        let result = envelope.into_checked()?;

        if let Some(code) = result.script_error.filter(|c| c != SUCCESS_CODE) {
            return Err(ClientError::FileMaker {
                code,
                message: format!("Script {script} failed"),
            });
        }

        match result.script_result {
            Some(raw) if !raw.is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Value::Null),
        }
    }

    /// OAuth variant of session creation: empty body, identifier and request
    /// id carried in dedicated headers, token returned in a header.
    pub(crate) async fn post_oauth_session(
        &self,
        request_id: &str,
        identifier: &str,
    ) -> Result<ExchangeResponse, ClientError> {
        let url = self.sessions_url();
        tracing::debug!("Proxying OAuth database login request to: {}", url);

        let response = self
            .http
            .post(url)
            .header(FM_OAUTH_REQUEST_ID_HEADER, request_id)
            .header(FM_OAUTH_IDENTIFIER_HEADER, identifier)
            .json(&json!({}))
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let access_token = response
            .headers()
            .get(FM_ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "body": text }));

        tracing::debug!("FileMaker OAuth database login returned {}", status);
        Ok(ExchangeResponse {
            status,
            access_token,
            body,
            headers,
        })
    }
}
