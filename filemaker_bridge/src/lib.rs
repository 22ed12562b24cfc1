//! filemaker_bridge - FileMaker Data API session management and OAuth bridging
//!
//! This crate keeps one shared, lazily renewed Data API session for data
//! access, drives FileMaker's proxied OAuth handshake, and turns the
//! credentials FileMaker signs into normalized identities.

mod bridge;
mod client;
mod config;
mod coordination;
mod identity;
mod oauth;
mod session;
mod utils;

#[cfg(test)]
mod test_utils;

pub use bridge::FileMakerBridge;

pub use client::{ClientError, CredentialRole, FileMakerClient, FmMessage, ProviderList};

pub use config::{BridgeConfig, ConfigError, Credentials, FMB_ROUTE_PREFIX, SessionPolicy};

pub use coordination::{
    CoordinationError, OAuthCallbackParams, authenticate_user, handle_oauth_callback,
    is_success_code, login_with_magic_link, run_data_script,
};

pub use identity::{IdentityRecord, IdentityTranslator};

pub use oauth::{
    CorrelationEntry, ExchangeFailure, ExchangeOutcome, InitiateResponse, OAuthBridge,
    OAuthCompletion, OAuthError, OAuthStatus,
};

pub use session::{SessionBackend, SessionError, SessionInfo, SessionManager};
