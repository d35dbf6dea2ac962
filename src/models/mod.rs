// src/models/mod.rs

//! Domain models for the listing importer.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod amenity;
mod config;
pub mod draft;
mod listing;
mod step;

// Re-export all public types
pub use amenity::AmenityRaw;
pub use config::{
    Config, DraftDefaults, ImportConfig, LoggingConfig, Messages, ScraperConfig, ENV_BASE_URL,
    ENV_PHOTO_CAP, ENV_SOURCE, ENV_STEP_TIMEOUT,
};
pub use draft::{AggregatedDraft, CanonicalListingDraft};
pub use listing::ListingUrl;
pub use step::{ImportStep, StepResult, StepStatus};
