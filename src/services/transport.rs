// src/services/transport.rs

//! Remote scrape transport.
//!
//! Sends one step request to the scraping service and hands back the raw
//! reply. Classification of that reply is the executor's job.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::{ImportStep, ListingUrl, ScraperConfig};
use crate::services::CookieStore;
use crate::utils::http::create_async_client;

/// Raw HTTP status and body of a step call.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteReply {
    pub status: u16,
    /// Parsed JSON body; a non-JSON body is kept as a string
    pub body: Value,
}

impl RemoteReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The "scrape a step for a URL" capability.
#[async_trait]
pub trait ScrapeTransport: Send + Sync {
    /// Perform one step call. Only transport failures are errors.
    async fn scrape(&self, url: &ListingUrl, step: ImportStep) -> Result<RemoteReply>;
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    step: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    cookies: Option<String>,
}

/// JSON-over-HTTP transport to `{base}/scrape-{source}`.
#[derive(Debug, Clone)]
pub struct HttpScrapeTransport {
    client: reqwest::Client,
    endpoint: String,
    cookies: Arc<CookieStore>,
}

impl HttpScrapeTransport {
    /// Build a transport with its own client.
    pub fn new(config: &ScraperConfig, cookies: Arc<CookieStore>) -> Result<Self> {
        Ok(Self::with_client(
            create_async_client(config)?,
            config.scrape_endpoint(),
            cookies,
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        cookies: Arc<CookieStore>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            cookies,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request body for one step, carrying the cookies stored for the listing's domain.
    fn build_request<'a>(&self, url: &'a ListingUrl, step: ImportStep) -> ScrapeRequest<'a> {
        let cookie_header = self.cookies.get(url.domain());
        ScrapeRequest {
            url: url.as_str(),
            step: step.number(),
            cookies: (!cookie_header.is_empty()).then_some(cookie_header),
        }
    }

    fn remember_cookies(&self, url: &ListingUrl, body: &Value) {
        let Some(Value::Array(items)) = body.get("cookies") else {
            return;
        };
        let returned: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
        if !returned.is_empty() {
            log::debug!("Saving {} cookies for {}", returned.len(), url.domain());
            self.cookies.save(url.domain(), &returned);
        }
    }
}

#[async_trait]
impl ScrapeTransport for HttpScrapeTransport {
    async fn scrape(&self, url: &ListingUrl, step: ImportStep) -> Result<RemoteReply> {
        let request = self.build_request(url, step);
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = parse_body(&text);

        self.remember_cookies(url, &body);
        Ok(RemoteReply::new(status, body))
    }
}

/// JSON when possible, otherwise the trimmed text (or `null` when empty).
fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}
