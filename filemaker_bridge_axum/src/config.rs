//! Web-layer settings for the filemaker_bridge_axum crate

use std::sync::LazyLock;

/// Provider used by `/oauth/initiate` when the request names none
/// Default: "Microsoft"
pub static FMB_DEFAULT_OAUTH_PROVIDER: LazyLock<String> = LazyLock::new(|| {
    std::env::var("FMB_DEFAULT_OAUTH_PROVIDER")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "Microsoft".to_string())
});
