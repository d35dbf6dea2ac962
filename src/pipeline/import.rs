// src/pipeline/import.rs

//! Import orchestration.
//!
//! Validates the listing URL, runs the four extraction steps strictly in
//! order and turns the merged data into a `CanonicalListingDraft`. Any step
//! failure aborts the whole import; partial drafts are never returned.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::models::draft::keys;
use crate::models::{
    AggregatedDraft, CanonicalListingDraft, ImportConfig, ImportStep, ListingUrl,
};
use crate::services::{AmenityCategorizer, AmenityNormalizer, PhotoCurator, StepRunner};

use super::state::ImportState;

/// Progress event emitted after each successful step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportProgress {
    pub step: u8,
    pub total: u8,
    pub message: String,
}

impl ImportProgress {
    fn completed(step: ImportStep) -> Self {
        Self {
            step: step.number(),
            total: ImportStep::TOTAL,
            message: format!("{} extracted", step.label()),
        }
    }
}

/// Sequences the extraction steps and post-processing of one listing.
pub struct ImportOrchestrator {
    runner: Arc<dyn StepRunner>,
    normalizer: AmenityNormalizer,
    categorizer: AmenityCategorizer,
    curator: PhotoCurator,
    config: ImportConfig,
}

impl ImportOrchestrator {
    /// Create an orchestrator with the built-in amenity tables.
    pub fn new(runner: Arc<dyn StepRunner>, config: ImportConfig) -> Self {
        Self {
            runner,
            normalizer: AmenityNormalizer::default(),
            categorizer: AmenityCategorizer::default(),
            curator: PhotoCurator::new(config.photo_cap),
            config,
        }
    }

    /// Import a listing without progress reporting.
    pub async fn import(&self, url: &str) -> Result<CanonicalListingDraft> {
        self.import_with_progress(url, |_| {}).await
    }

    /// Import a listing, reporting each successful step to `on_progress`.
    pub async fn import_with_progress<F>(
        &self,
        url: &str,
        mut on_progress: F,
    ) -> Result<CanonicalListingDraft>
    where
        F: FnMut(&ImportProgress) + Send,
    {
        let listing = ListingUrl::parse(url, &self.config)?;
        log::info!("Importing listing {} ({})", listing.listing_id(), listing);

        let mut state = ImportState::default();
        let mut draft = AggregatedDraft::new();
        let mut current = Some(ImportStep::Identity);
        state.begin(ImportStep::Identity)?;

        while let Some(step) = current {
            log::info!("[{}] {}", step, listing.listing_id());
            let result = match self.runner.run(&listing, step).await {
                Ok(result) => result,
                Err(e) => {
                    state.fail()?;
                    log::warn!("Import of {} {}: {}", listing.listing_id(), state, e);
                    return Err(e);
                }
            };

            let added = draft.merge(&result.data);
            log::debug!("Step {} added {} fields", step.number(), added);
            on_progress(&ImportProgress::completed(step));
            current = state.complete()?;
        }

        let output = self.build_draft(&draft, &listing);
        log::info!(
            "Imported {}: {} amenities, {} photos",
            listing.listing_id(),
            output.amenities.len(),
            output.photos.len()
        );
        Ok(output)
    }

    /// Apply defaults and run the amenity and photo engines over the aggregate.
    fn build_draft(&self, draft: &AggregatedDraft, listing: &ListingUrl) -> CanonicalListingDraft {
        let defaults = &self.config.defaults;

        let amenities = self.normalizer.normalize(&draft.raw_amenities());
        let categorized_amenities = self.categorizer.categorize(&amenities);
        let photos = self.curator.curate(&draft.raw_photos());

        CanonicalListingDraft {
            title: draft.text(keys::TITLE).unwrap_or_default(),
            description: draft.text(keys::DESCRIPTION).unwrap_or_default(),
            property_type: draft.text(keys::PROPERTY_TYPE).unwrap_or_default(),
            location: self.config.location_placeholder.clone(),
            price: draft.number(keys::PRICE).unwrap_or(defaults.price),
            bedroom_count: draft.count(keys::BEDROOMS).unwrap_or(defaults.bedrooms),
            bathroom_count: draft.count(keys::BATHROOMS).unwrap_or(defaults.bathrooms),
            bed_count: draft.count(keys::BEDS).unwrap_or(defaults.beds),
            guest_capacity: draft
                .count(keys::GUEST_CAPACITY)
                .unwrap_or(defaults.guest_capacity),
            amenities,
            categorized_amenities,
            photos,
            source_url: listing.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::error::{AppError, ErrorKind};
    use crate::models::StepResult;

    const URL: &str = "https://www.airbnb.com.br/rooms/12345?check_in=2024-01-01&check_out=2024-01-05&foo=bar";

    /// Scripted runner that records every call.
    struct ScriptedRunner {
        fail_at: Option<(ImportStep, fn(u8) -> AppError)>,
        calls: Mutex<Vec<(String, u8)>>,
    }

    impl ScriptedRunner {
        fn ok() -> Arc<Self> {
            Self::failing(None)
        }

        fn failing(fail_at: Option<(ImportStep, fn(u8) -> AppError)>) -> Arc<Self> {
            Arc::new(Self {
                fail_at,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn steps_called(&self) -> Vec<u8> {
            self.calls.lock().unwrap().iter().map(|(_, s)| *s).collect()
        }
    }

    fn step_data(step: ImportStep) -> Map<String, Value> {
        let value = match step {
            ImportStep::Identity => json!({
                "title": "Casa na praia",
                "description": "Pé na areia",
                "type": "Casa inteira"
            }),
            ImportStep::Capacity => json!({
                "price": "R$ 450",
                "bedrooms": 3,
                "guests": "6 hóspedes",
                "title": "ignored"
            }),
            ImportStep::Amenities => json!({
                "amenities": [
                    { "text": "O que esse lugar oferece" },
                    { "text": "Wi-fi", "icon": "wifi" },
                    "Ar condicionado",
                    "Mostrar todas as 20 comodidades",
                    { "text": "Piscina" }
                ]
            }),
            ImportStep::Photos => json!({
                "photos": [
                    "https://x/small_1.jpg",
                    "https://x/1.jpg",
                    { "url": "https://x/1.jpg" },
                    { "src": "https://x/2.jpg" }
                ]
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[async_trait]
    impl StepRunner for ScriptedRunner {
        async fn run(&self, url: &ListingUrl, step: ImportStep) -> Result<StepResult> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), step.number()));
            match self.fail_at {
                Some((at, make)) if at == step => Err(make(step.number())),
                _ => Ok(StepResult::success(step, step_data(step))),
            }
        }
    }

    fn orchestrator(runner: Arc<ScriptedRunner>) -> ImportOrchestrator {
        ImportOrchestrator::new(runner, ImportConfig::default())
    }

    #[tokio::test]
    async fn full_import_builds_canonical_draft() {
        let runner = ScriptedRunner::ok();
        let draft = orchestrator(runner.clone()).import(URL).await.unwrap();

        assert_eq!(runner.steps_called(), vec![1, 2, 3, 4]);
        assert_eq!(draft.title, "Casa na praia");
        assert_eq!(draft.property_type, "Casa inteira");
        assert_eq!(draft.price, 450.0);
        assert_eq!(draft.bedroom_count, 3);
        assert_eq!(draft.guest_capacity, 6);
        assert_eq!(draft.amenities, vec!["Wi-Fi", "Ar-condicionado", "Piscina"]);
        assert_eq!(draft.photos, vec!["https://x/1.jpg", "https://x/2.jpg"]);
        assert_eq!(draft.location, "Localização a definir");
        assert_eq!(
            draft.source_url,
            "https://www.airbnb.com.br/rooms/12345?check_in=2024-01-01&check_out=2024-01-05"
        );

        let categorized: usize = draft.categorized_amenities.values().map(Vec::len).sum();
        assert_eq!(categorized, draft.amenities.len());
    }

    #[tokio::test]
    async fn runner_receives_sanitized_url() {
        let runner = ScriptedRunner::ok();
        orchestrator(runner.clone()).import(URL).await.unwrap();

        let calls = runner.calls.lock().unwrap();
        assert!(calls.iter().all(|(url, _)| !url.contains("foo=bar")));
    }

    #[tokio::test]
    async fn missing_fields_get_defaults() {
        struct EmptyRunner;

        #[async_trait]
        impl StepRunner for EmptyRunner {
            async fn run(&self, _url: &ListingUrl, step: ImportStep) -> Result<StepResult> {
                Ok(StepResult::success(step, Map::new()))
            }
        }

        let orchestrator = ImportOrchestrator::new(Arc::new(EmptyRunner), ImportConfig::default());
        let draft = orchestrator.import(URL).await.unwrap();

        assert_eq!(draft.bedroom_count, 1);
        assert_eq!(draft.bathroom_count, 1);
        assert_eq!(draft.bed_count, 1);
        assert_eq!(draft.guest_capacity, 2);
        assert_eq!(draft.price, 0.0);
        assert!(draft.amenities.is_empty());
        assert!(draft.categorized_amenities.is_empty());
    }

    #[tokio::test]
    async fn step_two_failure_never_runs_later_steps() {
        let runner = ScriptedRunner::failing(Some((ImportStep::Capacity, |step: u8| {
            AppError::remote_service(step, 500u16, "extraction miss")
        })));
        let err = orchestrator(runner.clone()).import(URL).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteService);
        assert_eq!(runner.steps_called(), vec![1, 2]);
    }

    #[tokio::test]
    async fn step_one_failure_aborts_immediately() {
        let runner = ScriptedRunner::failing(Some((ImportStep::Identity, |step: u8| {
            AppError::remote_service(step, 404u16, "not found")
        })));
        assert!(orchestrator(runner.clone()).import(URL).await.is_err());
        assert_eq!(runner.steps_called(), vec![1]);
    }

    #[tokio::test]
    async fn timeout_on_step_two_discards_draft() {
        let runner = ScriptedRunner::failing(Some((ImportStep::Capacity, |step: u8| {
            AppError::remote_timeout(step)
        })));
        let mut progress = Vec::new();
        let err = orchestrator(runner.clone())
            .import_with_progress(URL, |p| progress.push(p.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RemoteTimeout { step: Some(2) }));
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].step, 1);
    }

    #[tokio::test]
    async fn progress_reports_each_successful_step() {
        let runner = ScriptedRunner::ok();
        let mut progress = Vec::new();
        orchestrator(runner)
            .import_with_progress(URL, |p| progress.push(p.clone()))
            .await
            .unwrap();

        let steps: Vec<u8> = progress.iter().map(|p| p.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
        assert!(progress.iter().all(|p| p.total == 4 && !p.message.is_empty()));
    }

    #[tokio::test]
    async fn invalid_url_makes_no_remote_calls() {
        let runner = ScriptedRunner::ok();
        let err = orchestrator(runner.clone())
            .import("https://www.airbnb.com/experiences/1")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert!(runner.steps_called().is_empty());
    }
}
