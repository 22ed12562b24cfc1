//! Shared FileMaker Data API session: creation, caching, expiry, health
//! checks and revocation.

mod errors;
mod main;
mod types;

pub use errors::SessionError;
pub use main::{SessionBackend, SessionManager};
pub use types::SessionInfo;
