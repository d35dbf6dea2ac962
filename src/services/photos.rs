// src/services/photos.rs

//! Photo curation: drop thumbnails, dedupe, cap.

use std::collections::HashSet;

/// Default number of photos kept per listing.
pub const DEFAULT_PHOTO_CAP: usize = 20;

/// Lowercase URL fragments that mark low-resolution variants.
pub const LOW_RES_MARKERS: &[&str] = &["small", "thumb", "tiny", "x_small"];

/// Filters raw photo URLs down to a bounded, duplicate-free list.
#[derive(Debug, Clone)]
pub struct PhotoCurator {
    cap: usize,
}

impl PhotoCurator {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Curate photo URLs, preserving input order.
    ///
    /// Blank entries and URLs containing a low-resolution marker
    /// (case-insensitive) are dropped, duplicates keep their first
    /// occurrence and at most `cap` URLs are returned.
    pub fn curate<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        let curated: Vec<String> = raw
            .iter()
            .map(|url| url.as_ref().trim())
            .filter(|url| !url.is_empty() && !is_low_res(url))
            .filter(|url| seen.insert(*url))
            .take(self.cap)
            .map(str::to_string)
            .collect();

        if curated.len() < raw.len() {
            log::debug!("Curated {} of {} photos", curated.len(), raw.len());
        }
        curated
    }
}

impl Default for PhotoCurator {
    fn default() -> Self {
        Self::new(DEFAULT_PHOTO_CAP)
    }
}

/// Whether a URL points at a thumbnail-sized rendition.
pub fn is_low_res(url: &str) -> bool {
    let lower = url.to_lowercase();
    LOW_RES_MARKERS.iter().any(|marker| lower.contains(marker))
}
