//! Draft structures: the per-import accumulator and the final output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::amenity::amenity_phrases;
use crate::utils::first_number;

/// Canonical keys of the aggregated draft.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PROPERTY_TYPE: &str = "propertyType";
    pub const PRICE: &str = "price";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const BEDS: &str = "beds";
    pub const GUEST_CAPACITY: &str = "guestCapacity";
    pub const RAW_AMENITIES: &str = "rawAmenities";
    pub const RAW_PHOTOS: &str = "rawPhotos";
}

/// Map a remote key onto the draft's canonical key.
fn canonical_key(key: &str) -> &str {
    match key {
        "type" | "property_type" => keys::PROPERTY_TYPE,
        "guests" | "maxGuests" | "guest_capacity" | "capacity" => keys::GUEST_CAPACITY,
        "amenities" | "raw_amenities" => keys::RAW_AMENITIES,
        "photos" | "images" | "raw_photos" => keys::RAW_PHOTOS,
        other => other,
    }
}

/// Accumulator for merged step data. Owned by a single import.
#[derive(Debug, Clone, Default)]
pub struct AggregatedDraft {
    fields: Map<String, Value>,
}

impl AggregatedDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge step data. A key is only filled when still absent;
    /// `null` values never fill a key. Returns the number of keys added.
    pub fn merge(&mut self, data: &Map<String, Value>) -> usize {
        let mut added = 0;
        for (key, value) in data {
            if value.is_null() {
                continue;
            }
            let key = canonical_key(key);
            if !self.fields.contains_key(key) {
                self.fields.insert(key.to_string(), value.clone());
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Trimmed text value; numbers are rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric value, read from a JSON number or the first number in a string.
    pub fn number(&self, key: &str) -> Option<f64> {
        let number = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => first_number(s),
            _ => None,
        };
        number.filter(|n| n.is_finite() && *n >= 0.0)
    }

    /// Whole count, rounded to the nearest integer.
    pub fn count(&self, key: &str) -> Option<u32> {
        self.number(key)
            .map(|n| n.round())
            .filter(|n| *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
    }

    /// Raw amenity phrases in any of the accepted shapes, flattened.
    pub fn raw_amenities(&self) -> Vec<String> {
        self.get(keys::RAW_AMENITIES)
            .map(amenity_phrases)
            .unwrap_or_default()
    }

    /// Raw photo URLs; entries may be strings or objects with `url`/`src`.
    pub fn raw_photos(&self) -> Vec<String> {
        let Some(Value::Array(items)) = self.get(keys::RAW_PHOTOS) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| match item {
                Value::String(url) => Some(url.as_str()),
                Value::Object(map) => map
                    .get("url")
                    .or_else(|| map.get("src"))
                    .and_then(Value::as_str),
                _ => None,
            })
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Final normalized listing draft handed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalListingDraft {
    pub title: String,
    pub description: String,
    pub property_type: String,
    pub location: String,
    pub price: f64,
    pub bedroom_count: u32,
    pub bathroom_count: u32,
    pub bed_count: u32,
    pub guest_capacity: u32,
    /// Deduplicated canonical amenity names
    pub amenities: Vec<String>,
    /// Category name to canonical amenities; every amenity appears once
    pub categorized_amenities: BTreeMap<String, Vec<String>>,
    /// Curated photo URLs
    pub photos: Vec<String>,
    pub source_url: String,
}
