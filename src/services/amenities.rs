// src/services/amenities.rs

//! Amenity normalization.
//!
//! Raw amenity phrases are mapped onto a canonical vocabulary by consulting
//! a static table: exact match on the lowercased phrase first, then the
//! first table phrase contained in it (declaration order). Unmatched
//! phrases pass through with their first letter capitalized. Every
//! canonical name is also a key of the table, which keeps normalization
//! idempotent.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::utils::capitalize_first;

/// A `raw phrase (lowercase) → canonical name` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmenityMapping {
    pub phrase: &'static str,
    pub canonical: &'static str,
}

const fn map(phrase: &'static str, canonical: &'static str) -> AmenityMapping {
    AmenityMapping { phrase, canonical }
}

/// Built-in mapping table. Longer, more specific phrases come first so the
/// substring scan prefers them.
pub const AMENITY_MAPPINGS: &[AmenityMapping] = &[
    // Connectivity and work
    map("wi-fi", "Wi-Fi"),
    map("wifi", "Wi-Fi"),
    map("wireless", "Wi-Fi"),
    map("internet", "Wi-Fi"),
    map("espaço de trabalho", "Espaço de trabalho"),
    map("espaço de trabalho exclusivo", "Espaço de trabalho"),
    map("dedicated workspace", "Espaço de trabalho"),
    map("workspace", "Espaço de trabalho"),
    // Climate
    map("ar-condicionado", "Ar-condicionado"),
    map("ar condicionado", "Ar-condicionado"),
    map("air conditioning", "Ar-condicionado"),
    map("ventilador de teto", "Ventilador de teto"),
    map("ceiling fan", "Ventilador de teto"),
    map("ventilador", "Ventilador"),
    map("aquecimento", "Aquecimento"),
    map("heating", "Aquecimento"),
    map("lareira", "Lareira"),
    map("fireplace", "Lareira"),
    // Water features first: "hidromassagem" beats "banheira" and "piscina"
    map("jacuzzi", "Jacuzzi"),
    map("banheira de hidromassagem", "Jacuzzi"),
    map("hidromassagem", "Jacuzzi"),
    map("hot tub", "Jacuzzi"),
    map("ofurô", "Jacuzzi"),
    map("piscina", "Piscina"),
    map("pool", "Piscina"),
    // Kitchen
    map("micro-ondas", "Micro-ondas"),
    map("microondas", "Micro-ondas"),
    map("microwave", "Micro-ondas"),
    map("lava-louças", "Lava-louças"),
    map("lava louças", "Lava-louças"),
    map("dishwasher", "Lava-louças"),
    map("utensílios de cozinha", "Utensílios de cozinha"),
    map("utensílios básicos de cozinha", "Utensílios de cozinha"),
    map("cooking basics", "Utensílios de cozinha"),
    map("geladeira", "Geladeira"),
    map("refrigerador", "Geladeira"),
    map("refrigerator", "Geladeira"),
    map("fridge", "Geladeira"),
    map("fogão", "Fogão"),
    map("cooktop", "Fogão"),
    map("stove", "Fogão"),
    map("forno", "Forno"),
    map("oven", "Forno"),
    map("cafeteira", "Cafeteira"),
    map("máquina de café", "Cafeteira"),
    map("coffee", "Cafeteira"),
    map("cozinha", "Cozinha"),
    map("kitchen", "Cozinha"),
    // Bathroom
    map("secador de cabelo", "Secador de cabelo"),
    map("hair dryer", "Secador de cabelo"),
    map("água quente", "Água quente"),
    map("hot water", "Água quente"),
    map("banheira", "Banheira"),
    map("bathtub", "Banheira"),
    map("xampu", "Xampu"),
    map("shampoo", "Xampu"),
    // Laundry
    map("máquina de lavar", "Máquina de lavar"),
    map("lavadora", "Máquina de lavar"),
    map("washing machine", "Máquina de lavar"),
    map("washer", "Máquina de lavar"),
    map("secadora", "Secadora"),
    map("dryer", "Secadora"),
    map("ferro de passar", "Ferro de passar"),
    map("iron", "Ferro de passar"),
    // Bedroom and basics
    map("roupa de cama", "Roupa de cama"),
    map("roupas de cama", "Roupa de cama"),
    map("bed linens", "Roupa de cama"),
    map("cortinas blackout", "Cortinas blackout"),
    map("blackout", "Cortinas blackout"),
    map("berço", "Berço"),
    map("crib", "Berço"),
    map("cabides", "Cabides"),
    map("hangers", "Cabides"),
    map("toalhas", "Toalhas"),
    map("towels", "Toalhas"),
    map("itens básicos", "Itens básicos"),
    map("essentials", "Itens básicos"),
    // Entertainment
    map("tv a cabo", "TV a cabo"),
    map("cable tv", "TV a cabo"),
    map("smart tv", "Smart TV"),
    map("televisão", "TV"),
    map("tv", "TV"),
    map("sistema de som", "Sistema de som"),
    map("sound system", "Sistema de som"),
    map("videogame", "Videogame"),
    map("game console", "Videogame"),
    // Outdoor
    map("churrasqueira", "Churrasqueira"),
    map("bbq", "Churrasqueira"),
    map("barbecue", "Churrasqueira"),
    map("grill", "Churrasqueira"),
    map("varanda", "Varanda"),
    map("sacada", "Varanda"),
    map("balcony", "Varanda"),
    map("quintal", "Quintal"),
    map("backyard", "Quintal"),
    map("jardim", "Jardim"),
    map("garden", "Jardim"),
    // Views and access
    map("vista para o mar", "Vista para o mar"),
    map("vista para a praia", "Vista para o mar"),
    map("ocean view", "Vista para o mar"),
    map("sea view", "Vista para o mar"),
    map("vista para a montanha", "Vista para a montanha"),
    map("mountain view", "Vista para a montanha"),
    map("acesso à praia", "Acesso à praia"),
    map("pé na areia", "Acesso à praia"),
    map("beachfront", "Acesso à praia"),
    map("beach access", "Acesso à praia"),
    // Safety
    map("detector de monóxido de carbono", "Detector de monóxido de carbono"),
    map("carbon monoxide", "Detector de monóxido de carbono"),
    map("detector de fumaça", "Detector de fumaça"),
    map("alarme de fumaça", "Detector de fumaça"),
    map("smoke alarm", "Detector de fumaça"),
    map("smoke detector", "Detector de fumaça"),
    map("extintor de incêndio", "Extintor de incêndio"),
    map("extintor", "Extintor de incêndio"),
    map("fire extinguisher", "Extintor de incêndio"),
    map("kit de primeiros socorros", "Kit de primeiros socorros"),
    map("primeiros socorros", "Kit de primeiros socorros"),
    map("first aid", "Kit de primeiros socorros"),
    map("câmeras de segurança", "Câmeras de segurança"),
    map("security camera", "Câmeras de segurança"),
    // Building and access
    map("estacionamento gratuito", "Estacionamento gratuito"),
    map("free parking", "Estacionamento gratuito"),
    map("estacionamento", "Estacionamento"),
    map("garagem", "Estacionamento"),
    map("parking", "Estacionamento"),
    map("elevador", "Elevador"),
    map("elevator", "Elevador"),
    map("academia", "Academia"),
    map("gym", "Academia"),
    map("self check-in", "Self check-in"),
    map("aceita animais", "Aceita animais"),
    map("animais de estimação", "Aceita animais"),
    map("pets allowed", "Aceita animais"),
];

/// Section headers that precede the amenity list, in every locale seen.
const SECTION_HEADERS: &[&str] = &[
    "o que esse lugar oferece",
    "o que este lugar oferece",
    "what this place offers",
    "lo que ofrece este lugar",
    "lo que este lugar ofrece",
    "comodidades",
    "amenities",
];

/// Markers of an amenity the listing explicitly lacks.
const UNAVAILABLE_MARKERS: &[&str] = &[
    "indisponível",
    "não disponível",
    "não incluído",
    "unavailable",
    "not available",
    "not included",
    "no disponible",
];

static SHOW_ALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(mostrar|exibir|ver|show|see)\s+(todas|todos|all|as|os)?\s*(as|os|the)?\s*\d*\s*(comodidades|amenities|itens|items|servi[çc]os)\b",
    )
    .expect("show-all pattern is valid")
});

/// Whether a raw amenity phrase is UI noise rather than an amenity:
/// unavailability notes, "show all N amenities" controls and section headers.
pub fn is_noise(raw: &str) -> bool {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return true;
    }
    let header = lower.trim_end_matches([':', '?', '.']);
    SECTION_HEADERS.contains(&header)
        || UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m))
        || SHOW_ALL_RE.is_match(&lower)
}

/// Drop noise entries, keeping order.
pub fn filter_noise<S: AsRef<str>>(raw: &[S]) -> Vec<&str> {
    raw.iter()
        .map(AsRef::as_ref)
        .filter(|phrase| !is_noise(phrase))
        .collect()
}

/// Maps raw amenity phrases onto canonical names.
#[derive(Debug, Clone)]
pub struct AmenityNormalizer {
    mappings: &'static [AmenityMapping],
    exact: HashMap<&'static str, &'static str>,
}

impl AmenityNormalizer {
    /// Build a normalizer over a mapping table. Earlier rows win.
    pub fn new(mappings: &'static [AmenityMapping]) -> Self {
        let mut exact = HashMap::with_capacity(mappings.len());
        for m in mappings {
            exact.entry(m.phrase).or_insert(m.canonical);
        }
        Self { mappings, exact }
    }

    /// Normalize a list of raw phrases.
    ///
    /// Noise is dropped, each phrase is mapped, and the output is deduplicated
    /// keeping first occurrences.
    pub fn normalize<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for phrase in filter_noise(raw) {
            let Some(canonical) = self.normalize_one(phrase) else {
                continue;
            };
            if seen.insert(canonical.clone()) {
                out.push(canonical);
            }
        }
        out
    }

    /// Map a single phrase; `None` for blank input.
    pub fn normalize_one(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();

        if let Some(canonical) = self.exact.get(lower.as_str()) {
            return Some((*canonical).to_string());
        }
        if let Some(m) = self.mappings.iter().find(|m| lower.contains(m.phrase)) {
            return Some(m.canonical.to_string());
        }
        Some(capitalize_first(trimmed))
    }

    /// The table this normalizer consults.
    pub fn mappings(&self) -> &'static [AmenityMapping] {
        self.mappings
    }
}

impl Default for AmenityNormalizer {
    fn default() -> Self {
        Self::new(AMENITY_MAPPINGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_and_drops_control_strings() {
        let normalizer = AmenityNormalizer::default();
        let out = normalizer.normalize(&[
            "Wi-fi",
            "Ar condicionado",
            "Mostrar todas as 20 comodidades",
        ]);
        assert_eq!(out, vec!["Wi-Fi", "Ar-condicionado"]);
    }

    #[test]
    fn substring_match_uses_declaration_order() {
        let normalizer = AmenityNormalizer::default();
        assert_eq!(
            normalizer.normalize_one("Banheira de hidromassagem privativa").as_deref(),
            Some("Jacuzzi")
        );
        assert_eq!(
            normalizer.normalize_one("Piscina compartilhada").as_deref(),
            Some("Piscina")
        );
        assert_eq!(
            normalizer.normalize_one("Wifi rápido – 300 Mbps").as_deref(),
            Some("Wi-Fi")
        );
    }

    #[test]
    fn unmatched_passes_through_capitalized() {
        let normalizer = AmenityNormalizer::default();
        assert_eq!(
            normalizer.normalize_one("  mesa de sinuca ").as_deref(),
            Some("Mesa de sinuca")
        );
        assert_eq!(normalizer.normalize_one("   "), None);
    }

    #[test]
    fn output_is_deduplicated_in_first_seen_order() {
        let normalizer = AmenityNormalizer::default();
        let out = normalizer.normalize(&["Wifi", "Cozinha", "Wi-Fi", "kitchen", "Piscina"]);
        assert_eq!(out, vec!["Wi-Fi", "Cozinha", "Piscina"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let normalizer = AmenityNormalizer::default();
        let raw = [
            "Wi-fi",
            "Ar condicionado",
            "TV a cabo",
            "Estacionamento gratuito no local",
            "mesa de sinuca",
            "Detector de fumaça",
            "Vista para o mar",
            "Cozinha completa",
        ];
        let once = normalizer.normalize(&raw);
        let twice = normalizer.normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn every_canonical_name_maps_to_itself() {
        let normalizer = AmenityNormalizer::default();
        for m in normalizer.mappings() {
            assert_eq!(
                normalizer.normalize_one(m.canonical).as_deref(),
                Some(m.canonical),
                "canonical {:?} is not a fixed point",
                m.canonical
            );
        }
    }

    #[test]
    fn table_phrases_are_lowercase() {
        for m in AMENITY_MAPPINGS {
            assert_eq!(m.phrase, m.phrase.to_lowercase());
        }
    }

    #[test]
    fn recognizes_noise() {
        assert!(is_noise("Mostrar todas as 45 comodidades"));
        assert!(is_noise("Show all 32 amenities"));
        assert!(is_noise("O que esse lugar oferece"));
        assert!(is_noise("What this place offers"));
        assert!(is_noise("Indisponível: Detector de fumaça"));
        assert!(is_noise("Unavailable: Carbon monoxide alarm"));
        assert!(is_noise("  "));
        assert!(!is_noise("Wi-Fi"));
        assert!(!is_noise("Vista para o mar"));
    }
}
