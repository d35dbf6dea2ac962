// src/lib.rs

//! Listing Importer Library
//!
//! Turns a rental listing URL into a normalized property draft by driving a
//! remote scraping service through four extraction steps.

pub mod config;
pub mod error;
pub mod importer;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use error::{AppError, ErrorKind, Result};
pub use importer::ListingImporter;
