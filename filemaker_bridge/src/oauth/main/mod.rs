mod core;
mod exchange;

pub use core::OAuthBridge;
