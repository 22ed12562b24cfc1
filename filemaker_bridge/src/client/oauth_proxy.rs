use super::errors::ClientError;
use super::types::{OAuthUrlResponse, ProviderList};
use super::{
    FMS_APPLICATION_TYPE, FMS_APPLICATION_VERSION, FMS_REQUEST_ID_HEADER, FMS_RETURN_URL_HEADER,
    FileMakerClient,
};

impl FileMakerClient {
    /// `GET /fmws/oauthproviderinfo` on the given host.
    pub async fn get_oauth_providers(&self, host: &str) -> Result<ProviderList, ClientError> {
        let url = format!("{}/fmws/oauthproviderinfo", self.config.oauth_base_url(host));
        tracing::debug!("Fetching OAuth providers from: {}", url);

        let response = self
            .http
            .get(url)
            .header(FMS_APPLICATION_TYPE.0, FMS_APPLICATION_TYPE.1)
            .header(FMS_APPLICATION_VERSION.0, FMS_APPLICATION_VERSION.1)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("FileMaker provider discovery failed: {}", status);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// `GET /oauth/getoauthurl`; the body is the raw authentication URL and
    /// the request id arrives in a response header.
    pub(crate) async fn request_oauth_url(
        &self,
        host: &str,
        tracking_id: &str,
        provider: &str,
        return_url: &str,
    ) -> Result<OAuthUrlResponse, ClientError> {
        let url = format!("{}/oauth/getoauthurl", self.config.oauth_base_url(host));

        let response = self
            .http
            .get(url)
            .query(&[
                ("trackingID", tracking_id),
                ("provider", provider),
                ("address", host),
                ("X-FMS-OAuth-AuthType", "2"),
            ])
            .header(FMS_APPLICATION_TYPE.0, FMS_APPLICATION_TYPE.1)
            .header(FMS_APPLICATION_VERSION.0, FMS_APPLICATION_VERSION.1)
            .header(FMS_RETURN_URL_HEADER, return_url)
            .send()
            .await?;

        let status = response.status();
        let request_id = response
            .headers()
            .get(FMS_REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("OAuth initiation failed: {} - {}", status, body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let oauth_url = body.trim().to_string();
        if oauth_url.is_empty() {
            return Err(ClientError::Missing("OAuth URL".to_string()));
        }

        Ok(OAuthUrlResponse {
            oauth_url,
            request_id,
        })
    }
}
