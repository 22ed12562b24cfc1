use std::time::Duration;

/// Shorten a credential for logging.
pub(crate) fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(10).collect();
    if visible.len() < token.len() {
        format!("{visible}...")
    } else {
        visible
    }
}

pub(crate) fn gen_call_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn get_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(32)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default reqwest client: {}", e);
            reqwest::Client::new()
        })
}
