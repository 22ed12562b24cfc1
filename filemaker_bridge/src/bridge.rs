use std::sync::Arc;

use crate::client::FileMakerClient;
use crate::config::{BridgeConfig, ConfigError};
use crate::identity::IdentityTranslator;
use crate::oauth::OAuthBridge;
use crate::session::{SessionBackend, SessionManager};

/// Composition root: one instance per process, shared by reference.
///
/// Each service is constructed explicitly here, so tests get isolated state
/// by building a fresh bridge.
pub struct FileMakerBridge {
    config: Arc<BridgeConfig>,
    client: FileMakerClient,
    sessions: SessionManager,
    oauth: OAuthBridge,
    translator: IdentityTranslator,
}

impl FileMakerBridge {
    pub fn new(config: BridgeConfig) -> Self {
        let config = Arc::new(config);
        let client = FileMakerClient::new(config.clone());
        let backend: Arc<dyn SessionBackend> = Arc::new(client.clone());
        Self::with_backend(config, client, backend)
    }

    /// Load the configuration from the environment and build the services.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(BridgeConfig::from_env()?))
    }

    pub(crate) fn with_backend(
        config: Arc<BridgeConfig>,
        client: FileMakerClient,
        backend: Arc<dyn SessionBackend>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(backend, config.session_policy),
            oauth: OAuthBridge::new(client.clone()),
            translator: IdentityTranslator::new(&config.jwt_secret),
            client,
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn client(&self) -> &FileMakerClient {
        &self.client
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn oauth(&self) -> &OAuthBridge {
        &self.oauth
    }

    pub fn translator(&self) -> &IdentityTranslator {
        &self.translator
    }
}
