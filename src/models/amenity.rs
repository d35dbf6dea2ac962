//! Raw amenity shapes as delivered by the remote scraper.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw amenity entry, either a bare phrase or a record with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmenityRaw {
    Text(String),
    Object {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
}

impl AmenityRaw {
    /// Read one list element. Objects without a string `text` are skipped.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Object(map) => {
                let text = map.get("text")?.as_str()?.to_string();
                let field = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
                Some(Self::Object {
                    text,
                    icon: field("icon"),
                    category: field("category"),
                })
            }
            _ => None,
        }
    }

    /// The amenity phrase.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Object { text, .. } => text,
        }
    }
}

/// Flatten any accepted amenity payload into trimmed, non-empty phrases.
///
/// A plain string is split on newlines and commas; a list may mix bare
/// strings and `{text, icon?, category?}` records.
pub fn amenity_phrases(payload: &Value) -> Vec<String> {
    let raws: Vec<AmenityRaw> = match payload {
        Value::String(text) => text
            .split(['\n', ','])
            .map(|part| AmenityRaw::Text(part.to_string()))
            .collect(),
        Value::Array(items) => items.iter().filter_map(AmenityRaw::from_value).collect(),
        _ => Vec::new(),
    };

    raws.iter()
        .map(|raw| raw.text().trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}
