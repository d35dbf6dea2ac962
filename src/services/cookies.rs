// src/services/cookies.rs

//! Per-domain session cookie cache.
//!
//! Cookies handed back by the remote scraper are kept per normalized domain
//! and replayed on the next step, so consecutive steps look like one browsing
//! session. Entries expire lazily: an entry older than the TTL reads as empty
//! and is removed on that read. The store never touches the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use chrono::{DateTime, Duration, Utc};

use crate::utils::url::normalize_domain;

/// Default lifetime of a domain's cookies.
pub const COOKIE_TTL_HOURS: i64 = 8;

/// Time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cookies stored for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieEntry {
    pub domain: String,
    /// `name=value` pairs in first-seen order
    pub cookies: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

/// Thread-safe cookie cache keyed by normalized domain.
pub struct CookieStore {
    entries: Mutex<HashMap<String, CookieEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl CookieStore {
    /// Create an empty store with the default TTL and the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::hours(COOKIE_TTL_HOURS),
            clock,
        }
    }

    /// Process-wide store shared by every import.
    pub fn shared() -> Arc<CookieStore> {
        static SHARED: OnceLock<Arc<CookieStore>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(CookieStore::new())))
    }

    /// Merge cookies into a domain's entry, replacing same-named cookies.
    ///
    /// Accepts `name=value` strings; anything after the first `;` (cookie
    /// attributes) is dropped and entries without a name are ignored. The
    /// entry's timestamp is refreshed on every call.
    pub fn save<S: AsRef<str>>(&self, domain: &str, cookies: &[S]) {
        let key = normalize_domain(domain);
        if key.is_empty() {
            return;
        }

        let now = self.clock.now();
        let mut entries = self.lock();
        let entry = entries.entry(key.clone()).or_insert_with(|| CookieEntry {
            domain: key.clone(),
            cookies: Vec::new(),
            last_updated: now,
        });

        // never resurrect cookies that already expired
        if now - entry.last_updated > self.ttl {
            log::debug!("Discarding expired cookies for {}", key);
            entry.cookies.clear();
        }

        for raw in cookies {
            let Some((name, pair)) = parse_cookie(raw.as_ref()) else {
                continue;
            };
            match entry
                .cookies
                .iter_mut()
                .find(|existing| cookie_name(existing) == name)
            {
                Some(existing) => *existing = pair,
                None => entry.cookies.push(pair),
            }
        }
        entry.last_updated = now;
    }

    /// Cookie header value for a domain: stored pairs joined by `"; "`.
    ///
    /// Returns an empty string when nothing is stored or the entry is older
    /// than the TTL; an expired entry is removed.
    pub fn get(&self, domain: &str) -> String {
        let key = normalize_domain(domain);
        let now = self.clock.now();
        let mut entries = self.lock();

        let expired = match entries.get(&key) {
            None => return String::new(),
            Some(entry) => now - entry.last_updated > self.ttl,
        };
        if expired {
            log::info!("Cookies for {} expired; purging", key);
            entries.remove(&key);
            return String::new();
        }

        entries
            .get(&key)
            .map(|entry| entry.cookies.join("; "))
            .unwrap_or_default()
    }

    /// Remove every cookie stored for a domain.
    pub fn clear(&self, domain: &str) {
        let key = normalize_domain(domain);
        if self.lock().remove(&key).is_some() {
            log::debug!("Cleared cookies for {}", key);
        }
    }

    /// Snapshot of a domain's entry, expired or not.
    pub fn entry(&self, domain: &str) -> Option<CookieEntry> {
        self.lock().get(&normalize_domain(domain)).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CookieEntry>> {
        // a panic mid-update leaves at worst a stale cookie list
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for CookieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CookieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieStore")
            .field("domains", &self.lock().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Split a raw cookie into its name and the `name=value` pair.
fn parse_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), format!("{}={}", name, value.trim())))
}

fn cookie_name(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Manually advanced clock.
    struct TestClock(Mutex<DateTime<Utc>>);

    impl TestClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[test]
    fn domain_variants_share_an_entry() {
        let store = CookieStore::new();
        store.save("www.airbnb.com", &["a=1"]);
        store.save("airbnb.com", &["b=2"]);

        let header = store.get("airbnb.com");
        assert!(header.contains("a=1"));
        assert!(header.contains("b=2"));
        assert_eq!(store.get("https://www.airbnb.com/rooms/1"), header);
    }

    #[test]
    fn same_name_is_replaced_not_duplicated() {
        let store = CookieStore::new();
        store.save("airbnb.com", &["session=old", "locale=pt"]);
        store.save("airbnb.com", &["session=new; Path=/; HttpOnly"]);

        assert_eq!(store.get("airbnb.com"), "session=new; locale=pt");
    }

    #[test]
    fn malformed_cookies_are_ignored() {
        let store = CookieStore::new();
        store.save("airbnb.com", &["novalue", "=anon", "ok=1"]);
        assert_eq!(store.get("airbnb.com"), "ok=1");
    }

    #[test]
    fn expires_after_ttl_and_purges() {
        let clock = TestClock::new();
        let store = CookieStore::with_clock(clock.clone());
        store.save("airbnb.com", &["a=1"]);

        clock.advance(Duration::hours(7) + Duration::minutes(59));
        assert_eq!(store.get("airbnb.com"), "a=1");

        clock.advance(Duration::minutes(2));
        assert_eq!(store.get("airbnb.com"), "");
        assert!(store.entry("airbnb.com").is_none());
    }

    #[test]
    fn save_refreshes_timestamp() {
        let clock = TestClock::new();
        let store = CookieStore::with_clock(clock.clone());
        store.save("airbnb.com", &["a=1"]);
        clock.advance(Duration::hours(6));
        store.save("airbnb.com", &["b=2"]);
        clock.advance(Duration::hours(6));

        assert_eq!(store.get("airbnb.com"), "a=1; b=2");
    }

    #[test]
    fn save_on_expired_entry_drops_stale_cookies() {
        let clock = TestClock::new();
        let store = CookieStore::with_clock(clock.clone());
        store.save("airbnb.com", &["a=1"]);
        clock.advance(Duration::hours(9));
        store.save("airbnb.com", &["b=2"]);

        assert_eq!(store.get("airbnb.com"), "b=2");
    }

    #[test]
    fn clear_removes_domain_only() {
        let store = CookieStore::new();
        store.save("airbnb.com", &["a=1"]);
        store.save("airbnb.com.br", &["b=2"]);
        store.clear("https://www.airbnb.com");

        assert_eq!(store.get("airbnb.com"), "");
        assert_eq!(store.get("airbnb.com.br"), "b=2");
    }

    #[test]
    fn concurrent_saves_keep_every_cookie() {
        let store = Arc::new(CookieStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.save("airbnb.com", &[format!("c{i}={i}")]))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.entry("airbnb.com").unwrap().cookies.len(), 8);
    }

    #[test]
    fn shared_store_is_a_singleton() {
        assert!(Arc::ptr_eq(&CookieStore::shared(), &CookieStore::shared()));
    }
}
