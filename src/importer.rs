// src/importer.rs

//! Caller-facing entry point.
//!
//! Wires the HTTP transport, step executor, orchestrator and status probe
//! from a single `Config`.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{CanonicalListingDraft, Config, Messages};
use crate::pipeline::{ImportOrchestrator, ImportProgress};
use crate::services::{
    CookieStore, HttpScrapeTransport, RemoteStatus, StatusProbe, StepExecutor, StepRunner,
};

/// Imports listings and reports on the remote scraper.
pub struct ListingImporter {
    orchestrator: ImportOrchestrator,
    probe: StatusProbe,
    cookies: Arc<CookieStore>,
    messages: Messages,
}

impl ListingImporter {
    /// Build an importer sharing the process-wide cookie store.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_cookie_store(config, CookieStore::shared())
    }

    /// Build an importer around an explicit cookie store.
    pub fn with_cookie_store(config: &Config, cookies: Arc<CookieStore>) -> Result<Self> {
        config.validate()?;

        let transport = HttpScrapeTransport::new(&config.scraper, Arc::clone(&cookies))?;
        let executor = StepExecutor::with_deadline(
            Arc::new(transport),
            Duration::from_secs(config.scraper.step_timeout_secs),
        );

        Self::with_runner(config, Arc::new(executor), cookies)
    }

    /// Build an importer with a custom step runner.
    pub fn with_runner(
        config: &Config,
        runner: Arc<dyn StepRunner>,
        cookies: Arc<CookieStore>,
    ) -> Result<Self> {
        Ok(Self {
            orchestrator: ImportOrchestrator::new(runner, config.import.clone()),
            probe: StatusProbe::new(&config.scraper)?,
            cookies,
            messages: config.messages.clone(),
        })
    }

    /// Import one listing.
    pub async fn import(&self, url: &str) -> Result<CanonicalListingDraft> {
        self.orchestrator.import(url).await
    }

    /// Import one listing with a progress callback.
    pub async fn import_with_progress<F>(
        &self,
        url: &str,
        on_progress: F,
    ) -> Result<CanonicalListingDraft>
    where
        F: FnMut(&ImportProgress) + Send,
    {
        self.orchestrator.import_with_progress(url, on_progress).await
    }

    /// Probe the remote scraper.
    pub async fn check_remote_status(&self) -> RemoteStatus {
        self.probe.check().await
    }

    pub fn cookies(&self) -> &Arc<CookieStore> {
        &self.cookies
    }

    /// Messages used to render errors for users.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}
