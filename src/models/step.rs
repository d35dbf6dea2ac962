//! Extraction steps and their raw results.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One of the four fixed extraction phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImportStep {
    /// Title, description, property type
    Identity,
    /// Price, bedrooms, bathrooms, beds, guests
    Capacity,
    Amenities,
    Photos,
}

impl ImportStep {
    /// All steps in the order they run.
    pub const ALL: [ImportStep; 4] = [
        ImportStep::Identity,
        ImportStep::Capacity,
        ImportStep::Amenities,
        ImportStep::Photos,
    ];

    /// Number of steps in a full import.
    pub const TOTAL: u8 = 4;

    /// 1-based step number sent to the remote service.
    pub fn number(self) -> u8 {
        match self {
            ImportStep::Identity => 1,
            ImportStep::Capacity => 2,
            ImportStep::Amenities => 3,
            ImportStep::Photos => 4,
        }
    }

    /// Look up a step by its 1-based number.
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == number)
    }

    /// Human-readable description used in progress messages.
    pub fn label(self) -> &'static str {
        match self {
            ImportStep::Identity => "Basic information",
            ImportStep::Capacity => "Price and capacity",
            ImportStep::Amenities => "Amenities",
            ImportStep::Photos => "Photos",
        }
    }
}

impl fmt::Display for ImportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.number(), Self::TOTAL, self.label())
    }
}

/// Outcome reported by the remote for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[serde(alias = "Success", alias = "SUCCESS", alias = "ok")]
    Success,
    #[serde(alias = "Partial", alias = "PARTIAL")]
    Partial,
    #[serde(alias = "Error", alias = "ERROR", alias = "failed")]
    Error,
}

/// Raw output of one extraction step. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step: u8,

    #[serde(default = "default_total_steps")]
    pub total_steps: u8,

    pub status: StepStatus,

    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_total_steps() -> u8 {
    ImportStep::TOTAL
}

impl StepResult {
    /// Successful result carrying `data`.
    pub fn success(step: ImportStep, data: Map<String, Value>) -> Self {
        Self {
            step: step.number(),
            total_steps: ImportStep::TOTAL,
            status: StepStatus::Success,
            data,
            message: None,
        }
    }
}
