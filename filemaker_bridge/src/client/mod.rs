//! Outbound HTTP adapter for FileMaker Server.
//!
//! Request/response marshaling only: callers decide what a response means.

mod data_api;
mod errors;
mod oauth_proxy;
mod types;

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::utils::get_client;

pub use errors::ClientError;
pub use types::{CredentialRole, FmMessage, ProviderList};

pub(crate) use types::SUCCESS_CODE;

/// Fixed application identification expected by the FileMaker OAuth proxy
pub(crate) const FMS_APPLICATION_TYPE: (&str, &str) = ("X-FMS-Application-Type", "9");
pub(crate) const FMS_APPLICATION_VERSION: (&str, &str) = ("X-FMS-Application-Version", "15");
pub(crate) const FMS_RETURN_URL_HEADER: &str = "X-FMS-Return-URL";
pub(crate) const FMS_REQUEST_ID_HEADER: &str = "X-FMS-Request-ID";

pub(crate) const FM_OAUTH_REQUEST_ID_HEADER: &str = "X-FM-Data-OAuth-Request-Id";
pub(crate) const FM_OAUTH_IDENTIFIER_HEADER: &str = "X-FM-Data-OAuth-Identifier";
pub(crate) const FM_ACCESS_TOKEN_HEADER: &str = "X-FM-Data-Access-Token";

/// Thin wrapper around a pooled `reqwest::Client` bound to one FileMaker
/// deployment.
#[derive(Clone)]
pub struct FileMakerClient {
    http: reqwest::Client,
    config: Arc<BridgeConfig>,
}

impl FileMakerClient {
    pub fn new(config: Arc<BridgeConfig>) -> Self {
        Self {
            http: get_client(),
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}
