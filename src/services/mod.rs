//! Service layer for the listing importer.
//!
//! This module contains the business logic for:
//! - Session cookie bookkeeping (`CookieStore`)
//! - Amenity normalization and categorization (`AmenityNormalizer`, `AmenityCategorizer`)
//! - Photo curation (`PhotoCurator`)
//! - Remote step calls (`HttpScrapeTransport`, `StepExecutor`)
//! - Remote liveness (`StatusProbe`)

pub mod amenities;
pub mod categories;
pub mod cookies;
pub mod executor;
pub mod photos;
pub mod status;
pub mod transport;

pub use amenities::AmenityNormalizer;
pub use categories::AmenityCategorizer;
pub use cookies::{Clock, CookieEntry, CookieStore, SystemClock};
pub use executor::{classify_reply, StepExecutor, StepRunner};
pub use photos::PhotoCurator;
pub use status::{RemoteStatus, StatusProbe};
pub use transport::{HttpScrapeTransport, RemoteReply, ScrapeTransport};
