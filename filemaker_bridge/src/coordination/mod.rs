//! Login and data-access flows
//!
//! Functions here compose the client, session manager, OAuth bridge and
//! translator held by a [`FileMakerBridge`](crate::FileMakerBridge) into the
//! operations the web layer calls:
//! - `credentials`: username/password login through the authentication script
//! - `oauth`: the OAuth redirect callback, from correlation to identity
//! - `magic_link`: login with a credential FileMaker already signed
//! - `data`: script calls through the shared data session

mod auth_script;
mod credentials;
mod data;
mod errors;
mod magic_link;
mod oauth;

pub use credentials::authenticate_user;
pub use data::run_data_script;
pub use errors::CoordinationError;
pub use magic_link::login_with_magic_link;
pub use oauth::{OAuthCallbackParams, handle_oauth_callback, is_success_code};
