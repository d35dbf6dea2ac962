//! Validated listing URL.

use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ImportConfig;
use crate::utils::url::{normalize_domain, with_scheme};

/// A listing URL that passed validation and sanitization.
///
/// Only the check-in/check-out pair survives in the query string, and only
/// when both are present. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ListingUrl {
    url: String,
    listing_id: String,
    domain: String,
}

impl ListingUrl {
    /// Validate and sanitize a raw listing URL.
    pub fn parse(raw: &str, rules: &ImportConfig) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(AppError::invalid_url(raw, "URL is empty"));
        }

        let mut url = Url::parse(&with_scheme(raw))
            .map_err(|e| AppError::invalid_url(raw, format!("not a URL ({e})")))?;

        let host = url
            .host_str()
            .map(|h| h.to_lowercase())
            .ok_or_else(|| AppError::invalid_url(raw, "URL has no host"))?;
        if !Self::host_allowed(&host, &rules.allowed_hosts) {
            return Err(AppError::invalid_url(
                raw,
                format!("host '{host}' is not a supported listing source"),
            ));
        }

        let listing_id = Self::listing_id_from_path(url.path(), &rules.listing_path_marker)
            .ok_or_else(|| {
                AppError::invalid_url(
                    raw,
                    format!(
                        "path must contain '{}' followed by a listing id",
                        rules.listing_path_marker
                    ),
                )
            })?;

        let (check_in_key, check_out_key) = &rules.date_params;
        let mut check_in = None;
        let mut check_out = None;
        for (key, value) in url.query_pairs() {
            if value.is_empty() {
                continue;
            }
            if key == check_in_key.as_str() && check_in.is_none() {
                check_in = Some(value.into_owned());
            } else if key == check_out_key.as_str() && check_out.is_none() {
                check_out = Some(value.into_owned());
            }
        }

        url.set_query(None);
        url.set_fragment(None);
        if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
            url.query_pairs_mut()
                .append_pair(check_in_key, &check_in)
                .append_pair(check_out_key, &check_out);
        }

        Ok(Self {
            url: url.to_string(),
            listing_id,
            domain: normalize_domain(&host),
        })
    }

    /// The sanitized URL.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Numeric listing identifier taken from the path.
    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    /// Cookie-store key for this listing's site.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The allowed label must sit directly before the public suffix, so
    /// `airbnb.com.br` passes and `airbnb.evil.com` does not.
    fn host_allowed(host: &str, allowed: &[String]) -> bool {
        let labels: Vec<&str> = host.trim_end_matches('.').split('.').collect();
        labels.iter().enumerate().any(|(i, label)| {
            is_public_suffix(&labels[i + 1..])
                && allowed
                    .iter()
                    .map(|a| a.trim().to_lowercase())
                    .any(|a| !a.is_empty() && a == *label)
        })
    }

    fn listing_id_from_path(path: &str, marker: &str) -> Option<String> {
        let marker = marker.trim_matches('/');
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        segments.find(|s| s.eq_ignore_ascii_case(marker))?;
        let id = segments.next()?;
        (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
    }
}

/// Second-level labels used under country TLDs (`com.br`, `co.uk`).
const SECOND_LEVEL_LABELS: &[&str] = &["com", "co", "net", "org"];

/// A bare TLD, or a known second-level label under a two-letter country TLD.
fn is_public_suffix(labels: &[&str]) -> bool {
    let is_tld = |label: &str| label.len() >= 2 && label.chars().all(|c| c.is_ascii_alphabetic());
    match labels {
        [tld] => is_tld(*tld),
        [second, country] => {
            SECOND_LEVEL_LABELS.contains(second) && country.len() == 2 && is_tld(*country)
        }
        _ => false,
    }
}

impl fmt::Display for ListingUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl AsRef<str> for ListingUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl From<ListingUrl> for String {
    fn from(value: ListingUrl) -> Self {
        value.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<ListingUrl> {
        ListingUrl::parse(raw, &ImportConfig::default())
    }

    #[test]
    fn keeps_only_date_pair() {
        let url = parse(
            "https://www.airbnb.com.br/rooms/12345?check_in=2024-01-01&check_out=2024-01-05&foo=bar",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.airbnb.com.br/rooms/12345?check_in=2024-01-01&check_out=2024-01-05"
        );
        assert_eq!(url.listing_id(), "12345");
        assert_eq!(url.domain(), "airbnb.com.br");
    }

    #[test]
    fn reorders_date_pair() {
        let url = parse(
            "https://www.airbnb.com/rooms/9?check_out=2024-01-05&adults=2&check_in=2024-01-01",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.airbnb.com/rooms/9?check_in=2024-01-01&check_out=2024-01-05"
        );
    }

    #[test]
    fn drops_lone_date_param() {
        let url = parse("https://www.airbnb.com/rooms/9?check_in=2024-01-01&source=share").unwrap();
        assert_eq!(url.as_str(), "https://www.airbnb.com/rooms/9");
    }

    #[test]
    fn drops_fragment_and_adds_scheme() {
        let url = parse("airbnb.com.br/rooms/77#photos").unwrap();
        assert_eq!(url.as_str(), "https://airbnb.com.br/rooms/77");
    }

    #[test]
    fn rejects_foreign_host() {
        let err = parse("https://www.booking.com/rooms/12345").unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_lookalike_host() {
        assert!(parse("https://notairbnb.com/rooms/12345").is_err());
    }

    #[test]
    fn allowed_label_must_precede_public_suffix() {
        assert!(parse("https://airbnb.evil.com/rooms/1").is_err());
        assert!(parse("https://www.airbnb.attacker.com.br/rooms/1").is_err());
        assert!(parse("https://airbnb/rooms/1").is_err());

        assert!(parse("https://airbnb.com/rooms/1").is_ok());
        assert!(parse("https://www.airbnb.com.br/rooms/1").is_ok());
        assert!(parse("https://www.airbnb.co.uk/rooms/1").is_ok());
        assert!(parse("https://pt.airbnb.de/rooms/1").is_ok());
    }

    #[test]
    fn rejects_missing_listing_id() {
        assert!(parse("https://www.airbnb.com/rooms/").is_err());
        assert!(parse("https://www.airbnb.com/rooms/abc").is_err());
        assert!(parse("https://www.airbnb.com/experiences/12345").is_err());
        assert!(parse("   ").is_err());
    }
}
