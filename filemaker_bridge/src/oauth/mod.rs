mod errors;
mod main;
mod storage;
mod types;

pub use errors::OAuthError;
pub use main::OAuthBridge;
pub use types::{
    CorrelationEntry, ExchangeFailure, ExchangeOutcome, InitiateResponse, OAuthCompletion,
    OAuthStatus,
};
