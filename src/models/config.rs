//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding `scraper.base_url`.
pub const ENV_BASE_URL: &str = "SCRAPER_BASE_URL";
/// Environment variable overriding `scraper.source`.
pub const ENV_SOURCE: &str = "SCRAPER_SOURCE";
/// Environment variable overriding `scraper.step_timeout_secs`.
pub const ENV_STEP_TIMEOUT: &str = "SCRAPER_STEP_TIMEOUT_SECS";
/// Environment variable overriding `import.photo_cap`.
pub const ENV_PHOTO_CAP: &str = "IMPORT_PHOTO_CAP";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote scraping service settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Import pipeline settings
    #[serde(default)]
    pub import: ImportConfig,

    /// User-facing message strings
    #[serde(default)]
    pub messages: Messages,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.scraper.base_url = base_url.trim().to_string();
        }
        if let Some(source) = lookup(ENV_SOURCE).filter(|v| !v.trim().is_empty()) {
            self.scraper.source = source.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_STEP_TIMEOUT) {
            match raw.trim().parse() {
                Ok(secs) => self.scraper.step_timeout_secs = secs,
                Err(_) => log::warn!("Ignoring invalid {}: {:?}", ENV_STEP_TIMEOUT, raw),
            }
        }
        if let Some(raw) = lookup(ENV_PHOTO_CAP) {
            match raw.trim().parse() {
                Ok(cap) => self.import.photo_cap = cap,
                Err(_) => log::warn!("Ignoring invalid {}: {:?}", ENV_PHOTO_CAP, raw),
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.base_url.trim().is_empty() {
            return Err(AppError::validation("scraper.base_url is empty"));
        }
        url::Url::parse(self.scraper.base_url.trim()).map_err(|e| {
            AppError::validation(format!("scraper.base_url is not a valid URL: {e}"))
        })?;
        if self.scraper.source.trim().is_empty() {
            return Err(AppError::validation("scraper.source is empty"));
        }
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.step_timeout_secs == 0 {
            return Err(AppError::validation("scraper.step_timeout_secs must be > 0"));
        }
        if self.scraper.status_timeout_secs == 0 {
            return Err(AppError::validation(
                "scraper.status_timeout_secs must be > 0",
            ));
        }
        if self.import.photo_cap == 0 {
            return Err(AppError::validation("import.photo_cap must be > 0"));
        }
        if self.import.allowed_hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::validation("import.allowed_hosts is empty"));
        }
        if self.import.listing_path_marker.trim_matches('/').is_empty() {
            return Err(AppError::validation("import.listing_path_marker is empty"));
        }
        if self.import.date_params.0.is_empty() || self.import.date_params.1.is_empty() {
            return Err(AppError::validation(
                "import.date_params must name two query parameters",
            ));
        }
        Ok(())
    }
}

/// Remote scraping service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Root URL of the scraping service
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Listing source; selects the `/scrape-{source}` endpoint
    #[serde(default = "defaults::source")]
    pub source: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Deadline for a single extraction step in seconds
    #[serde(default = "defaults::step_timeout")]
    pub step_timeout_secs: u64,

    /// Deadline for the liveness probe in seconds
    #[serde(default = "defaults::status_timeout")]
    pub status_timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl ScraperConfig {
    /// Base URL without trailing slashes.
    pub fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Endpoint for step extraction.
    pub fn scrape_endpoint(&self) -> String {
        format!("{}/scrape-{}", self.base(), self.source.trim())
    }

    /// Endpoint for the liveness probe.
    pub fn status_endpoint(&self) -> String {
        format!("{}/", self.base())
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            source: defaults::source(),
            user_agent: defaults::user_agent(),
            step_timeout_secs: defaults::step_timeout(),
            status_timeout_secs: defaults::status_timeout(),
            connect_timeout_secs: defaults::connect_timeout(),
        }
    }
}

/// Import pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Maximum number of photos kept in a draft
    #[serde(default = "defaults::photo_cap")]
    pub photo_cap: usize,

    /// Location text used until the listing is geocoded
    #[serde(default = "defaults::location_placeholder")]
    pub location_placeholder: String,

    /// Host labels a listing URL must carry (e.g. `airbnb`)
    #[serde(default = "defaults::allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Path segment introducing the listing id
    #[serde(default = "defaults::listing_path_marker")]
    pub listing_path_marker: String,

    /// Check-in / check-out query parameters kept during sanitization
    #[serde(default = "defaults::date_params")]
    pub date_params: (String, String),

    /// Values applied to fields missing after all steps
    #[serde(default)]
    pub defaults: DraftDefaults,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            photo_cap: defaults::photo_cap(),
            location_placeholder: defaults::location_placeholder(),
            allowed_hosts: defaults::allowed_hosts(),
            listing_path_marker: defaults::listing_path_marker(),
            date_params: defaults::date_params(),
            defaults: DraftDefaults::default(),
        }
    }
}

/// Fallback values for absent draft fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftDefaults {
    #[serde(default = "defaults::one")]
    pub bedrooms: u32,
    #[serde(default = "defaults::one")]
    pub bathrooms: u32,
    #[serde(default = "defaults::one")]
    pub beds: u32,
    #[serde(default = "defaults::guest_capacity")]
    pub guest_capacity: u32,
    #[serde(default)]
    pub price: f64,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            bedrooms: 1,
            bathrooms: 1,
            beds: 1,
            guest_capacity: defaults::guest_capacity(),
            price: 0.0,
        }
    }
}

/// User-facing message strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    /// Shown for every timeout or congestion condition
    #[serde(default = "defaults::msg_congestion")]
    pub congestion: String,

    /// Shown when the listing URL is rejected
    #[serde(default = "defaults::msg_invalid_url")]
    pub invalid_url: String,

    /// Shown when the remote fails without a message
    #[serde(default = "defaults::msg_generic_failure")]
    pub generic_failure: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            congestion: defaults::msg_congestion(),
            invalid_url: defaults::msg_invalid_url(),
            generic_failure: defaults::msg_generic_failure(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Scraper defaults
    pub fn base_url() -> String {
        "http://127.0.0.1:3000".into()
    }
    pub fn source() -> String {
        "airbnb".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; listing-importer/0.1)".into()
    }
    pub fn step_timeout() -> u64 {
        55
    }
    pub fn status_timeout() -> u64 {
        10
    }
    pub fn connect_timeout() -> u64 {
        10
    }

    // Import defaults
    pub fn photo_cap() -> usize {
        20
    }
    pub fn location_placeholder() -> String {
        "Localização a definir".into()
    }
    pub fn allowed_hosts() -> Vec<String> {
        vec!["airbnb".into()]
    }
    pub fn listing_path_marker() -> String {
        "/rooms/".into()
    }
    pub fn date_params() -> (String, String) {
        ("check_in".into(), "check_out".into())
    }
    pub fn one() -> u32 {
        1
    }
    pub fn guest_capacity() -> u32 {
        2
    }

    // Message defaults
    pub fn msg_congestion() -> String {
        "The listing source is congested right now. Please try again in a few minutes.".into()
    }
    pub fn msg_invalid_url() -> String {
        "Invalid listing link. Use a listing URL like https://www.airbnb.com.br/rooms/123456"
            .into()
    }
    pub fn msg_generic_failure() -> String {
        "Could not import this listing. Please try again.".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_step_timeout() {
        let mut config = Config::default();
        config.scraper.step_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.scraper.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_photo_cap() {
        let mut config = Config::default();
        config.import.photo_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn endpoints_trim_trailing_slash() {
        let mut config = ScraperConfig::default();
        config.base_url = "https://scraper.example.com//".to_string();
        assert_eq!(
            config.scrape_endpoint(),
            "https://scraper.example.com/scrape-airbnb"
        );
        assert_eq!(config.status_endpoint(), "https://scraper.example.com/");
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://scraper.example.com"),
            (ENV_STEP_TIMEOUT, "30"),
            (ENV_PHOTO_CAP, "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.scraper.base_url, "https://scraper.example.com");
        assert_eq!(config.scraper.step_timeout_secs, 30);
        assert_eq!(config.import.photo_cap, 20);
        assert_eq!(config.scraper.source, "airbnb");
    }

    #[test]
    fn load_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[scraper]\nbase_url = \"https://scraper.example.com\"\n\n[import]\nphoto_cap = 8\n\n[import.defaults]\nguest_capacity = 4"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.scraper.base_url, "https://scraper.example.com");
        assert_eq!(config.scraper.step_timeout_secs, 55);
        assert_eq!(config.import.photo_cap, 8);
        assert_eq!(config.import.defaults.guest_capacity, 4);
        assert_eq!(config.import.defaults.bedrooms, 1);
        assert_eq!(config.import.listing_path_marker, "/rooms/");
    }

    #[test]
    fn load_or_default_falls_back() {
        let config = Config::load_or_default("/nonexistent/listing-importer.toml");
        assert_eq!(config.import.photo_cap, 20);
    }
}
