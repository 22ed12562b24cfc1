use std::collections::HashMap;

use filemaker_bridge::{BridgeConfig, FileMakerBridge};
use serde_json::Value;

use super::mock_filemaker::MockFileMaker;

pub const TEST_JWT_SECRET: &str = "integration-jwt-secret";
pub const VALID_USERNAME: &str = "alice";
pub const VALID_PASSWORD: &str = "wonderland";
pub const OAUTH_ACCESS_TOKEN: &str = "oauth-access-token";

/// Base64 of `data-user:data-pass`
pub const DATA_BASIC: &str = "ZGF0YS11c2VyOmRhdGEtcGFzcw==";
/// Base64 of `auth-user:auth-pass`
pub const AUTH_BASIC: &str = "YXV0aC11c2VyOmF1dGgtcGFzcw==";

pub fn test_config(mock: &MockFileMaker) -> BridgeConfig {
    let env: HashMap<&str, String> = HashMap::from([
        ("FILEMAKER_SERVER", mock.base_url.clone()),
        ("FILEMAKER_OAUTH_SCHEME", "http".to_string()),
        ("FILEMAKER_DATABASE", "Bridge".to_string()),
        ("FILEMAKER_DATA_USERNAME", "data-user".to_string()),
        ("FILEMAKER_DATA_PASSWORD", "data-pass".to_string()),
        ("FILEMAKER_AUTH_USERNAME", "auth-user".to_string()),
        ("FILEMAKER_AUTH_PASSWORD", "auth-pass".to_string()),
        ("FILEMAKER_JWT_SECRET", TEST_JWT_SECRET.to_string()),
        ("FMB_APP_URL", "https://app.example.com".to_string()),
        ("FILEMAKER_SESSION_RETRY_BACKOFF_MS", "10".to_string()),
    ]);
    BridgeConfig::from_lookup(|key| env.get(key).cloned()).expect("test config should build")
}

pub fn test_bridge(mock: &MockFileMaker) -> FileMakerBridge {
    FileMakerBridge::new(test_config(mock))
}

pub fn sign(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("signing should succeed")
}
