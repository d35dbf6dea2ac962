// src/services/status.rs

//! Liveness probe for the remote scraping service. Informational only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::ScraperConfig;
use crate::utils::http::{body_message, create_probe_client};

/// Result of a status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStatus {
    pub online: bool,
    /// HTTP status, 0 when no response was received
    pub status: u16,
    pub message: String,
}

impl RemoteStatus {
    fn offline(status: u16, message: impl Into<String>) -> Self {
        Self {
            online: false,
            status,
            message: message.into(),
        }
    }
}

/// Issues a single GET against the service root.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    client: reqwest::Client,
    endpoint: String,
}

impl StatusProbe {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            client: create_probe_client(config)?,
            endpoint: config.status_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check the remote. Never fails: problems are reported as offline.
    pub async fn check(&self) -> RemoteStatus {
        let response = match self.client.get(&self.endpoint).send().await {
            Ok(response) => response,
            Err(e) => {
                log::info!("Status probe to {} failed: {}", self.endpoint, e);
                return RemoteStatus::offline(0, e.to_string());
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body_message(&body).unwrap_or_else(|| status.to_string());
            return RemoteStatus::offline(status.as_u16(), message);
        }

        RemoteStatus {
            online: true,
            status: status.as_u16(),
            message: status_message(&body).unwrap_or_else(|| "online".to_string()),
        }
    }
}

/// The service's own `status` field, falling back to `message`.
fn status_message(body: &Value) -> Option<String> {
    body.get("status")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| body_message(body))
}
