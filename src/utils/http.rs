// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::ScraperConfig;

/// Create the asynchronous client used for step calls.
///
/// No overall request timeout is set here: each step runs under its own
/// deadline in the executor.
pub fn create_async_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()?;
    Ok(client)
}

/// Create a client for short informational requests such as the status probe.
pub fn create_probe_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.status_timeout_secs))
        .build()?;
    Ok(client)
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `error`, then `message`; a bare JSON string is used as-is.
pub fn body_message(body: &serde_json::Value) -> Option<String> {
    let text = match body {
        serde_json::Value::String(text) => Some(text.as_str()),
        serde_json::Value::Object(map) => ["error", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(serde_json::Value::as_str)),
        _ => None,
    }?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
