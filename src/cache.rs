//! # Cache Store
//!
//! Keyed, time-aware store for secrets. No network awareness: the caching
//! decorator decides when to consult or refresh it.
//!
//! Entries live in a sharded map, so reads and writes on different keys do
//! not block each other; same-key writes are last-write-wins with no torn
//! entries. Expired entries are evicted lazily when read.

use crate::secret::Secret;
use anyhow::Result;
use dashmap::DashMap;
use regex::Regex;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default time a cache entry stays live (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Parse a human-readable duration string into `std::time::Duration`.
///
/// Supports formats: "30s", "1m", "5m", "1h", "1d".
///
/// # Errors
/// Returns an error for an empty string, a zero value, or anything not
/// matching `<number><unit>`.
pub fn parse_cache_duration(duration_str: &str) -> Result<Duration> {
    let duration_trimmed = duration_str.trim();

    if duration_trimmed.is_empty() {
        return Err(anyhow::anyhow!("Duration string cannot be empty"));
    }

    // Matches: <number><unit> where unit is s, m, h, or d
    let duration_regex = Regex::new(r"^(?P<number>\d+)(?P<unit>[smhd])$")
        .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;

    let interval_lower = duration_trimmed.to_lowercase();
    let captures = duration_regex.captures(&interval_lower).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid duration format '{}'. Expected format: <number><unit> (e.g., '30s', '5m', '1h')",
            duration_trimmed
        )
    })?;

    let number_str = captures
        .name("number")
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Failed to extract number from duration '{}'",
                duration_trimmed
            )
        })?
        .as_str();

    let unit = captures
        .name("unit")
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Failed to extract unit from duration '{}'",
                duration_trimmed
            )
        })?
        .as_str();

    let number: u64 = number_str.parse().map_err(|e| {
        anyhow::anyhow!("Invalid duration number in '{}': {}", duration_trimmed, e)
    })?;

    if number == 0 {
        return Err(anyhow::anyhow!(
            "Duration must be greater than 0, got '{}'",
            duration_trimmed
        ));
    }

    let seconds = match unit {
        "s" => number,
        "m" => number * 60,
        "h" => number * 3600,
        "d" => number * 86400,
        other => {
            return Err(anyhow::anyhow!(
                "Invalid unit '{}' in duration '{}'. Expected: s, m, h, or d",
                other,
                duration_trimmed
            ));
        }
    };

    Ok(Duration::from_secs(seconds))
}

/// Cache behavior configuration.
///
/// A single duration applied uniformly to all entries, immutable once the
/// cache is constructed. In host configuration files the TTL is written in
/// the human duration grammar, e.g. `ttl: "5m"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Time entries stay live after a refresh.
    #[serde(default = "default_ttl", deserialize_with = "deserialize_ttl")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_CACHE_TTL }
    }
}

fn default_ttl() -> Duration {
    DEFAULT_CACHE_TTL
}

fn deserialize_ttl<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_cache_duration(&raw).map_err(serde::de::Error::custom)
}

struct CacheEntry {
    secret: Secret,
    expires_at: Instant,
}

/// In-memory secret cache with per-entry expiry.
///
/// Owned by the caching decorator; each entry is replaced wholesale on
/// refresh, never partially updated.
pub struct SecretCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl std::fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SecretCache {
    /// Build a cache from configuration.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_ttl(config.ttl)
    }

    /// Build a cache with an explicit entry TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// The configured entry TTL.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// A live secret for `name`, or a miss when absent or expired.
    ///
    /// An expired entry found here is evicted before returning the miss.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Secret> {
        {
            let entry = self.entries.get(name)?;
            if entry.expires_at > Instant::now() {
                return Some(entry.secret.clone());
            }
        }
        // Entry guard is dropped above; evict only if still expired, so a
        // concurrent refresh is not thrown away.
        debug!(secret.name = name, "evicting expired cache entry");
        self.entries
            .remove_if(name, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    /// Store a secret under `name`, replacing any existing entry and
    /// stamping expiry at `now + ttl`.
    pub fn put(&self, name: &str, secret: Secret) {
        self.put_with_ttl(name, secret, self.ttl);
    }

    /// Store a secret with an explicit TTL for this entry only.
    pub fn put_with_ttl(&self, name: &str, secret: Secret, ttl: Duration) {
        self.entries.insert(
            name.to_string(),
            CacheEntry {
                secret,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Remove the entry for `name` immediately, regardless of expiry.
    pub fn invalidate(&self, name: &str) {
        self.entries.remove(name);
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries currently held, including not-yet-evicted expired
    /// ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
