// src/error.rs

//! Unified error handling for the listing importer.

use std::fmt;

use thiserror::Error;

use crate::models::Messages;

/// Result type alias for importer operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Listing URL failed validation
    #[error("Invalid listing URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A step exceeded its deadline or the remote reported congestion
    #[error("Remote scraper timed out{}", step_suffix(.step))]
    RemoteTimeout { step: Option<u8> },

    /// The remote call completed but reported a failure
    #[error("Remote scraper failed{} (status {}): {message}", step_suffix(.step), status_text(.status))]
    RemoteService {
        step: Option<u8>,
        status: Option<u16>,
        message: String,
    },

    /// Reserved: some steps succeeded and others did not
    #[error("Import produced partial data; missing steps {missing_steps:?}")]
    PartialData { missing_steps: Vec<u8> },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Coarse classification handed to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    RemoteTimeout,
    RemoteService,
    PartialData,
    Internal,
}

fn step_suffix(step: &Option<u8>) -> String {
    step.map(|s| format!(" at step {s}")).unwrap_or_default()
}

fn status_text(status: &Option<u16>) -> String {
    status.map_or_else(|| "n/a".to_string(), |s| s.to_string())
}

impl AppError {
    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error for the given step.
    pub fn remote_timeout(step: impl Into<Option<u8>>) -> Self {
        Self::RemoteTimeout { step: step.into() }
    }

    /// Create a remote service error.
    pub fn remote_service(
        step: impl Into<Option<u8>>,
        status: impl Into<Option<u16>>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteService {
            step: step.into(),
            status: status.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Collapse the error into the taxonomy the UI layer understands.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::RemoteTimeout { .. } => ErrorKind::RemoteTimeout,
            Self::RemoteService { .. } => ErrorKind::RemoteService,
            Self::PartialData { .. } => ErrorKind::PartialData,
            Self::Http(e) if e.is_timeout() => ErrorKind::RemoteTimeout,
            _ => ErrorKind::Internal,
        }
    }

    /// Whether re-running the whole import may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RemoteTimeout | ErrorKind::RemoteService
        )
    }

    /// Render the single message shown to the user for this error.
    ///
    /// Every timeout maps to the same congestion text, whichever step failed.
    pub fn user_message(&self, messages: &Messages) -> String {
        match self {
            Self::InvalidUrl { .. } => messages.invalid_url.clone(),
            Self::RemoteService { message, .. } if !message.trim().is_empty() => {
                message.trim().to_string()
            }
            _ => match self.kind() {
                ErrorKind::RemoteTimeout => messages.congestion.clone(),
                _ => messages.generic_failure.clone(),
            },
        }
    }
}
