// src/utils/url.rs

//! URL manipulation utilities.

/// Ensure a URL string carries a scheme, defaulting to `https://`.
///
/// # Examples
/// ```
/// use listing_importer::utils::url::with_scheme;
///
/// assert_eq!(with_scheme("airbnb.com/rooms/1"), "https://airbnb.com/rooms/1");
/// assert_eq!(with_scheme("http://airbnb.com"), "http://airbnb.com");
/// ```
pub fn with_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    }
}

fn has_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Normalize a domain (or full URL) into a cookie-store key.
///
/// Strips the scheme, a leading `www.`, any path, port or credentials, and
/// lowercases the remainder.
///
/// # Examples
/// ```
/// use listing_importer::utils::url::normalize_domain;
///
/// assert_eq!(normalize_domain("https://www.Airbnb.com/rooms/1"), "airbnb.com");
/// assert_eq!(normalize_domain("airbnb.com"), "airbnb.com");
/// ```
pub fn normalize_domain(domain: &str) -> String {
    let mut rest = domain.trim();
    for scheme in ["https://", "http://"] {
        if let Some(after) = rest
            .get(..scheme.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
            .and_then(|_| rest.get(scheme.len()..))
        {
            rest = after;
            break;
        }
    }

    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    let host = host.to_lowercase();

    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}
