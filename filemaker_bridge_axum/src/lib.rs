mod config;
mod error;
mod login;
mod oauth;
mod router;
mod session;


pub use config::FMB_DEFAULT_OAUTH_PROVIDER;
pub use error::IntoResponseError;
pub use router::{filemaker_bridge_router, filemaker_bridge_router_no_trace};

// Re-export the route prefix so embedding apps nest the router in the same place
pub use filemaker_bridge::{FMB_ROUTE_PREFIX, FileMakerBridge};
