// src/services/executor.rs

//! Step execution: one bounded, classified remote call per step.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{ImportStep, ListingUrl, StepResult, StepStatus};
use crate::services::transport::{RemoteReply, ScrapeTransport};
use crate::utils::http::body_message;

/// Default per-step deadline.
pub const STEP_DEADLINE: Duration = Duration::from_secs(55);

/// Lowercase fragments that mark a message as a timeout report.
pub const TIMEOUT_INDICATORS: &[&str] = &["timeout", "timed out", "tempo esgotado", "esgotou"];

/// Runs a single extraction step.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(&self, url: &ListingUrl, step: ImportStep) -> Result<StepResult>;
}

/// Single-attempt executor with a per-call deadline. Never retries.
#[derive(Clone)]
pub struct StepExecutor {
    transport: Arc<dyn ScrapeTransport>,
    deadline: Duration,
}

impl StepExecutor {
    pub fn new(transport: Arc<dyn ScrapeTransport>) -> Self {
        Self::with_deadline(transport, STEP_DEADLINE)
    }

    pub fn with_deadline(transport: Arc<dyn ScrapeTransport>, deadline: Duration) -> Self {
        Self {
            transport,
            deadline,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait]
impl StepRunner for StepExecutor {
    async fn run(&self, url: &ListingUrl, step: ImportStep) -> Result<StepResult> {
        log::debug!("Running step {} for {}", step, url);

        let reply = match tokio::time::timeout(self.deadline, self.transport.scrape(url, step)).await
        {
            Err(_elapsed) => {
                log::warn!("Step {} exceeded its {:?} deadline", step.number(), self.deadline);
                return Err(AppError::remote_timeout(step.number()));
            }
            Ok(Err(AppError::Http(e))) if e.is_timeout() => {
                log::warn!("Step {} transport timed out: {}", step.number(), e);
                return Err(AppError::remote_timeout(step.number()));
            }
            Ok(Err(AppError::Http(e))) => {
                return Err(AppError::remote_service(
                    step.number(),
                    e.status().map(|s| s.as_u16()),
                    e.to_string(),
                ));
            }
            Ok(result) => result?,
        };

        classify_reply(step, reply)
    }
}

/// Whether a remote message reports a timeout.
pub fn is_timeout_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TIMEOUT_INDICATORS.iter().any(|marker| lower.contains(marker))
}

/// The `status` the remote reported in its body, if it parses.
fn reported_status(body: &Value) -> Option<StepStatus> {
    body.get("status")
        .cloned()
        .and_then(|status| serde_json::from_value(status).ok())
}

/// Turn a raw reply into a step result or a classified error.
///
/// A 504 is always `RemoteTimeout`. A failed reply (non-2xx, a reported
/// `error` status, or a body that is not an object) becomes `RemoteTimeout`
/// when its message mentions a timeout and `RemoteService` otherwise.
/// Messages on successful replies are informational and never reclassify.
pub fn classify_reply(step: ImportStep, reply: RemoteReply) -> Result<StepResult> {
    let number = step.number();

    if reply.status == 504 {
        log::warn!("Step {} reported congestion (status 504)", number);
        return Err(AppError::remote_timeout(number));
    }

    let failed = !reply.is_success()
        || !reply.body.is_object()
        || reported_status(&reply.body) == Some(StepStatus::Error);
    if failed {
        let message = body_message(&reply.body);
        if message.as_deref().is_some_and(is_timeout_message) {
            log::warn!("Step {} reported a timeout (status {})", number, reply.status);
            return Err(AppError::remote_timeout(number));
        }
        log::warn!("Step {} failed with status {}", number, reply.status);
        let message = message.unwrap_or_else(|| {
            if reply.is_success() {
                "empty step reply".to_string()
            } else {
                String::new()
            }
        });
        return Err(AppError::remote_service(number, reply.status, message));
    }

    let result = serde_json::from_value::<StepResult>(reply.body).map_err(|e| {
        AppError::remote_service(number, reply.status, format!("malformed step reply: {e}"))
    })?;
    if result.step != number {
        log::warn!("Requested step {} but the remote answered step {}", number, result.step);
    }

    log::debug!("Step {} returned {} fields", number, result.data.len());
    Ok(result)
}
