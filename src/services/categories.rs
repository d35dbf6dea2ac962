// src/services/categories.rs

//! Amenity categorization.
//!
//! Buckets normalized amenities by keyword. Amenities no keyword claims get
//! an ad-hoc bucket named after their first significant word, or `outros`.
//! That fallback is a best-effort heuristic, not a classifier.

use std::collections::{BTreeMap, HashSet};

use unicode_segmentation::UnicodeSegmentation;

/// Fixed category names.
pub mod category {
    pub const KITCHEN: &str = "kitchen";
    pub const BATHROOM: &str = "bathroom";
    pub const BEDROOM: &str = "bedroom";
    pub const ENTERTAINMENT: &str = "entertainment";
    pub const OUTDOOR: &str = "outdoor";
    pub const VIEWS: &str = "views";
    pub const SAFETY: &str = "safety";
    pub const BASICS: &str = "basics";
    /// Bucket for amenities without a significant word
    pub const OTHER: &str = "outros";
}

/// Keyword → category, scanned in order; the first contained keyword wins.
pub const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    // kitchen
    ("cozinha", category::KITCHEN),
    ("geladeira", category::KITCHEN),
    ("micro-ondas", category::KITCHEN),
    ("fogão", category::KITCHEN),
    ("forno", category::KITCHEN),
    ("cafeteira", category::KITCHEN),
    ("lava-louças", category::KITCHEN),
    ("freezer", category::KITCHEN),
    ("liquidificador", category::KITCHEN),
    ("torradeira", category::KITCHEN),
    ("chaleira", category::KITCHEN),
    ("mesa de jantar", category::KITCHEN),
    // bathroom
    ("banheir", category::BATHROOM),
    ("secador de cabelo", category::BATHROOM),
    ("água quente", category::BATHROOM),
    ("xampu", category::BATHROOM),
    ("sabonete", category::BATHROOM),
    ("chuveiro", category::BATHROOM),
    ("bidê", category::BATHROOM),
    // bedroom
    ("roupa de cama", category::BEDROOM),
    ("cabides", category::BEDROOM),
    ("travesseiro", category::BEDROOM),
    ("berço", category::BEDROOM),
    ("blackout", category::BEDROOM),
    ("guarda-roupa", category::BEDROOM),
    ("cômoda", category::BEDROOM),
    // entertainment
    ("tv", category::ENTERTAINMENT),
    ("streaming", category::ENTERTAINMENT),
    ("videogame", category::ENTERTAINMENT),
    ("sistema de som", category::ENTERTAINMENT),
    ("livros", category::ENTERTAINMENT),
    ("jogos", category::ENTERTAINMENT),
    ("piano", category::ENTERTAINMENT),
    // outdoor
    ("piscina", category::OUTDOOR),
    ("jacuzzi", category::OUTDOOR),
    ("churrasqueira", category::OUTDOOR),
    ("varanda", category::OUTDOOR),
    ("jardim", category::OUTDOOR),
    ("quintal", category::OUTDOOR),
    ("área externa", category::OUTDOOR),
    ("espreguiçadeira", category::OUTDOOR),
    ("fogueira", category::OUTDOOR),
    // views
    ("vista", category::VIEWS),
    ("praia", category::VIEWS),
    ("orla", category::VIEWS),
    // safety
    ("detector", category::SAFETY),
    ("extintor", category::SAFETY),
    ("primeiros socorros", category::SAFETY),
    ("câmera", category::SAFETY),
    ("segurança", category::SAFETY),
    ("alarme", category::SAFETY),
    ("cofre", category::SAFETY),
    // basics
    ("wi-fi", category::BASICS),
    ("ar-condicionado", category::BASICS),
    ("aquecimento", category::BASICS),
    ("ventilador", category::BASICS),
    ("lareira", category::BASICS),
    ("itens básicos", category::BASICS),
    ("toalhas", category::BASICS),
    ("máquina de lavar", category::BASICS),
    ("secadora", category::BASICS),
    ("ferro de passar", category::BASICS),
    ("estacionamento", category::BASICS),
    ("elevador", category::BASICS),
    ("espaço de trabalho", category::BASICS),
    ("self check-in", category::BASICS),
    ("aceita animais", category::BASICS),
    ("academia", category::BASICS),
];

/// Words never used to name an ad-hoc category.
const STOPWORDS: &[&str] = &[
    "a", "o", "as", "os", "e", "de", "da", "do", "das", "dos", "em", "no", "na", "nos", "nas",
    "com", "sem", "para", "por", "um", "uma", "the", "of", "and", "with", "for", "in", "on",
    "at", "to", "kit", "tipo", "área", "item", "itens",
];

/// Minimum length (in characters) of a significant word.
const MIN_WORD_LEN: usize = 3;

/// Groups normalized amenities into named buckets.
#[derive(Debug, Clone)]
pub struct AmenityCategorizer {
    keywords: &'static [(&'static str, &'static str)],
}

impl AmenityCategorizer {
    pub fn new(keywords: &'static [(&'static str, &'static str)]) -> Self {
        Self { keywords }
    }

    /// Partition amenities into categories.
    ///
    /// Each amenity lands in exactly one bucket (repeats are placed once);
    /// empty buckets are omitted.
    pub fn categorize<S: AsRef<str>>(&self, amenities: &[S]) -> BTreeMap<String, Vec<String>> {
        let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut placed = HashSet::new();

        for amenity in amenities.iter().map(AsRef::as_ref) {
            if amenity.trim().is_empty() || !placed.insert(amenity) {
                continue;
            }
            let bucket = self.category_for(amenity);
            buckets.entry(bucket).or_default().push(amenity.to_string());
        }

        buckets
    }

    /// Category name for a single amenity.
    pub fn category_for(&self, amenity: &str) -> String {
        let lower = amenity.to_lowercase();
        if let Some((_, category)) = self.keywords.iter().find(|(kw, _)| lower.contains(kw)) {
            return (*category).to_string();
        }
        fallback_category(&lower)
    }
}

impl Default for AmenityCategorizer {
    fn default() -> Self {
        Self::new(CATEGORY_KEYWORDS)
    }
}

/// Ad-hoc bucket: the first significant word, or `outros`.
fn fallback_category(lower: &str) -> String {
    lower
        .unicode_words()
        .find(|word| {
            word.chars().count() >= MIN_WORD_LEN
                && word.chars().any(char::is_alphabetic)
                && !STOPWORDS.contains(word)
        })
        .map_or_else(|| category::OTHER.to_string(), str::to_string)
}
