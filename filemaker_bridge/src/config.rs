//! Central configuration for the filemaker_bridge crate

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use thiserror::Error;

/// Route prefix for all filemaker_bridge endpoints
///
/// This is the main prefix under which the bridge endpoints will be mounted.
/// Default: "/fmb"
pub static FMB_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("FMB_ROUTE_PREFIX").unwrap_or_else(|_| "/fmb".to_string()));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// Username/password pair used for basic-auth session creation
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Timing policy for the shared Data API session.
///
/// FileMaker's real server-side timeout is not reported to clients, so the
/// lifetime here is a local estimate rather than protocol truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// How long a created token is trusted before it is recreated
    pub lifetime: Duration,
    /// Minimum time between liveness probes of the cached token
    pub health_check_interval: Duration,
    /// Creation attempts before the error is surfaced to the caller
    pub create_attempts: u32,
    /// Backoff unit; attempt `n` waits `n * retry_backoff` before retrying
    pub retry_backoff: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs(15 * 60),
            health_check_interval: Duration::from_secs(5 * 60),
            create_attempts: 3,
            retry_backoff: Duration::from_millis(1000),
        }
    }
}

/// Complete bridge configuration, built once by the composition root and
/// handed to each service.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Data API base URL, e.g. `https://fm.example.com`
    pub server_url: String,
    /// Host used for the OAuth proxy endpoints, e.g. `fm.example.com`
    pub oauth_host: String,
    /// Scheme used when talking to `oauth_host`
    pub oauth_scheme: String,
    pub database: String,
    pub api_version: String,
    pub data_credentials: Credentials,
    pub auth_credentials: Credentials,
    pub jwt_secret: String,
    /// Application base URL, used for the OAuth return URL and result pages
    pub app_url: String,
    pub route_prefix: String,
    pub auth_layout: String,
    pub auth_script: String,
    pub session_policy: SessionPolicy,
    pub oauth_pending_ttl: Duration,
}

impl BridgeConfig {
    /// Build the configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::Missing(key.to_string()))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let role_credentials = |prefix: &str| -> Result<Credentials, ConfigError> {
            let username = lookup(&format!("FILEMAKER_{prefix}_USERNAME"))
                .filter(|v| !v.is_empty())
                .map(Ok)
                .unwrap_or_else(|| required("FILEMAKER_USERNAME"))?;
            let password = lookup(&format!("FILEMAKER_{prefix}_PASSWORD"))
                .filter(|v| !v.is_empty())
                .map(Ok)
                .unwrap_or_else(|| required("FILEMAKER_PASSWORD"))?;
            Ok(Credentials { username, password })
        };

        let server_url = required("FILEMAKER_SERVER")?
            .trim_end_matches('/')
            .to_string();
        let oauth_host = match lookup("FILEMAKER_HOST").filter(|v| !v.is_empty()) {
            Some(host) => host,
            None => host_of(&server_url)?,
        };

        let defaults = SessionPolicy::default();
        let session_policy = SessionPolicy {
            lifetime: parse_secs(
                &lookup,
                "FILEMAKER_SESSION_LIFETIME_SECS",
                defaults.lifetime,
            )?,
            health_check_interval: parse_secs(
                &lookup,
                "FILEMAKER_HEALTH_CHECK_INTERVAL_SECS",
                defaults.health_check_interval,
            )?,
            create_attempts: parse_attempts(&lookup, defaults.create_attempts)?,
            retry_backoff: Duration::from_millis(parse_number(
                &lookup,
                "FILEMAKER_SESSION_RETRY_BACKOFF_MS",
                defaults.retry_backoff.as_millis() as u64,
            )?),
        };
        if session_policy.create_attempts == 0 {
            return Err(ConfigError::Invalid(
                "FILEMAKER_SESSION_CREATE_ATTEMPTS".to_string(),
                "0".to_string(),
            ));
        }

        Ok(Self {
            server_url,
            oauth_host,
            oauth_scheme: optional("FILEMAKER_OAUTH_SCHEME", "https"),
            database: required("FILEMAKER_DATABASE")?,
            api_version: optional("FILEMAKER_API_VERSION", "v1"),
            data_credentials: role_credentials("DATA")?,
            auth_credentials: role_credentials("AUTH")?,
            jwt_secret: required("FILEMAKER_JWT_SECRET")?,
            app_url: required("FMB_APP_URL")?.trim_end_matches('/').to_string(),
            route_prefix: optional("FMB_ROUTE_PREFIX", "/fmb")
                .trim_end_matches('/')
                .to_string(),
            auth_layout: optional("FILEMAKER_AUTH_LAYOUT", "API_REQUEST"),
            auth_script: optional("FILEMAKER_AUTH_SCRIPT", "v1_ReturnUsersJWT"),
            session_policy,
            oauth_pending_ttl: parse_secs(
                &lookup,
                "FILEMAKER_OAUTH_PENDING_TTL_SECS",
                Duration::from_secs(5 * 60),
            )?,
        })
    }

    /// `{server}/fmi/data/{version}/databases/{database}`
    pub(crate) fn database_url(&self) -> String {
        format!(
            "{}/fmi/data/{}/databases/{}",
            self.server_url, self.api_version, self.database
        )
    }

    /// `{scheme}://{host}`
    pub(crate) fn oauth_base_url(&self, host: &str) -> String {
        format!("{}://{}", self.oauth_scheme, host)
    }

    /// Address FileMaker redirects the browser to once the provider is done.
    pub fn oauth_return_url(&self) -> String {
        format!("{}{}/oauth/callback", self.app_url, self.route_prefix)
    }

    pub fn oauth_success_url(&self) -> String {
        format!("{}/auth/oauth-success", self.app_url)
    }

    pub fn oauth_error_url(&self) -> String {
        format!("{}/auth/oauth-error", self.app_url)
    }
}

fn host_of(server_url: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(server_url)
        .map_err(|e| ConfigError::Invalid("FILEMAKER_SERVER".to_string(), e.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| {
        ConfigError::Invalid("FILEMAKER_SERVER".to_string(), server_url.to_string())
    })?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn parse_number<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        None => Ok(default),
    }
}

fn parse_attempts<F>(lookup: &F, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const KEY: &str = "FILEMAKER_SESSION_CREATE_ATTEMPTS";
    let attempts = parse_number(lookup, KEY, u64::from(default))?;
    u32::try_from(attempts).map_err(|_| ConfigError::Invalid(KEY.to_string(), attempts.to_string()))
}

fn parse_secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_number(lookup, key, default.as_secs()).map(Duration::from_secs)
}
