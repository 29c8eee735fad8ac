//! TTL-keyed analytics result cache
//!
//! A simple in-process store mapping `(brand_id, data_kind)` to a serialized
//! payload with a per-entry expiry. Expiry is checked at read time; stale
//! entries are not swept in the background, they are lazily replaced by the
//! next `put`. The store has no knowledge of analytics semantics and no
//! size-based eviction: the key space is bounded by brand count times two
//! data kinds.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Cache partition discriminator.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Website,
    Social,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    brand_id: String,
    kind: DataKind,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Timestamps of a live cache entry, exposed for status endpoints and tests.
#[derive(Debug, Clone, Serialize)]
pub struct CacheMetadata {
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct AnalyticsCache {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl AnalyticsCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Get the cached payload for a key, treating expired entries as absent.
    pub fn get(&self, brand_id: &str, kind: DataKind) -> Option<Value> {
        let key = CacheKey {
            brand_id: brand_id.to_string(),
            kind,
        };
        let entry = self.entries.get(&key)?;
        if Utc::now() > entry.expires_at {
            return None;
        }
        Some(entry.payload.clone())
    }

    /// Upsert a payload under a key. Replaces any prior entry and its expiry
    /// regardless of the prior entry's remaining life.
    pub fn put(&self, brand_id: &str, kind: DataKind, payload: Value, ttl: Duration) {
        let now = Utc::now();
        let ttl = ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let key = CacheKey {
            brand_id: brand_id.to_string(),
            kind,
        };
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                cached_at: now,
                expires_at,
            },
        );
    }

    /// Drop an entry so the next read goes back to the source.
    pub fn invalidate(&self, brand_id: &str, kind: DataKind) {
        let key = CacheKey {
            brand_id: brand_id.to_string(),
            kind,
        };
        self.entries.remove(&key);
    }

    /// Timestamps for a live (non-expired) entry.
    pub fn metadata(&self, brand_id: &str, kind: DataKind) -> Option<CacheMetadata> {
        let key = CacheKey {
            brand_id: brand_id.to_string(),
            kind,
        };
        let entry = self.entries.get(&key)?;
        if Utc::now() > entry.expires_at {
            return None;
        }
        Some(CacheMetadata {
            cached_at: entry.cached_at,
            expires_at: entry.expires_at,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
