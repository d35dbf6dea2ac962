// src/config.rs

//! Configuration loading utilities.
//!
//! Resolves the effective configuration: file (or defaults), then
//! environment overrides, then validation.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load configuration from an optional TOML file and the process environment.
///
/// A missing or unreadable file falls back to defaults with a warning.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    resolve_config(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], with an explicit environment lookup.
pub fn resolve_config(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    config.apply_env(lookup);
    config.validate()?;

    log::debug!(
        "Scraper endpoint {} (step deadline {}s)",
        config.scraper.scrape_endpoint(),
        config.scraper.step_timeout_secs
    );
    Ok(config)
}
