//! Response cache in front of the market API.
//!
//! Entries live in the key-value store under `cache_<url>` as
//! `{"data": <payload>, "createdAt": <rfc3339>}`. An entry is fresh while
//! `now - createdAt < ttl`. Stale entries are never deleted, only overwritten
//! by the next successful fetch for the same key.

use {
    super::{KeyValueStore, Result},
    crate::{
        config::{DF, cache_key},
        utils::Clock,
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::{future::Future, sync::Arc, time::Duration},
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Value,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.created_at).to_std() {
            Ok(age) => age < ttl,
            // Entry from the future (clock moved backwards): treat as just written
            Err(_) => true,
        }
    }
}

#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the cached payload for `key` if fresh, otherwise runs `fetcher`
    /// and stores its result. A failed fetch propagates and leaves any stored
    /// entry in place.
    pub async fn get<F, Fut>(&self, key: &str, ttl: Duration, fetcher: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(entry) = self.stored(key).await {
            if entry.is_fresh(self.clock.now(), ttl) {
                #[cfg(debug_assertions)]
                if DF.log_cache {
                    log::debug!("cache hit: {}", key);
                }
                return Ok(entry.data);
            }
        }

        #[cfg(debug_assertions)]
        if DF.log_cache {
            log::debug!("cache miss: {}", key);
        }

        let data = fetcher().await?;

        let entry = CacheEntry {
            data,
            created_at: self.clock.now(),
        };
        match serde_json::to_string(&entry) {
            Ok(encoded) => {
                if let Err(e) = self.store.set(&cache_key(key), &encoded).await {
                    log::warn!("Failed to persist cache entry for {}: {}", key, e);
                }
            }
            Err(e) => log::warn!("Failed to encode cache entry for {}: {}", key, e),
        }

        Ok(entry.data)
    }

    /// The stored entry for `key` regardless of age. Unreadable or malformed
    /// entries count as absent.
    pub async fn stored(&self, key: &str) -> Option<CacheEntry> {
        let raw = match self.store.get(&cache_key(key)).await {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Cache read failed for {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Ignoring malformed cache entry for {}: {}", key, e);
                None
            }
        }
    }
}
