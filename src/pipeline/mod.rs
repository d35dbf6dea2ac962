//! Import pipeline.
//!
//! - `ImportOrchestrator`: runs the four extraction steps and builds the draft
//! - `ImportState`: the per-import state machine

pub mod import;
pub mod state;

pub use import::{ImportOrchestrator, ImportProgress};
pub use state::ImportState;
