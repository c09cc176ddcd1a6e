//! Listing cache.
//!
//! Key/value store with a uniform per-entry time-to-live, holding serialized
//! JSON snapshots of the listing endpoints. The cache is never authoritative;
//! the database is the single source of truth and every cache failure
//! degrades to it.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use thiserror::Error;

/// Cache key for the makes listing.
pub const ALL_MAKES: &str = "all_makes";

/// Cache key for the cars listing.
pub const ALL_CARS: &str = "all_cars";

/// Errors surfaced by a cache backend.
///
/// Callers treat these as faults to absorb, never as request failures.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend rejected or failed the operation.
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Key/value cache for serialized listing snapshots.
///
/// Payloads are opaque strings so that corruption is observable at the
/// deserialization step of the read path.
#[async_trait]
pub trait ListingCache: Send + Sync {
    /// Look up a payload. `Ok(None)` is a miss, `Err` a backend fault.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a payload under the configured TTL. Last writer wins.
    async fn set(&self, key: &str, payload: String) -> Result<(), CacheError>;
}

/// In-process cache backed by `moka` with a uniform time-to-live.
pub struct MemoryCache {
    entries: Cache<String, String>,
}

impl MemoryCache {
    /// Create a cache whose entries expire `ttl` after being written.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder().max_capacity(64).time_to_live(ttl).build();

        Self { entries }
    }
}

#[async_trait]
impl ListingCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).await)
    }

    async fn set(&self, key: &str, payload: String) -> Result<(), CacheError> {
        self.entries.insert(key.to_owned(), payload).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set(ALL_MAKES, "[1,2,3]".to_owned()).await.unwrap();

        let payload = cache.get(ALL_MAKES).await.unwrap();
        assert_eq!(payload.as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn test_miss_is_none() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        assert!(cache.get(ALL_CARS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new(Duration::from_millis(50));
        cache.set(ALL_MAKES, "[]".to_owned()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(ALL_MAKES).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set(ALL_CARS, "old".to_owned()).await.unwrap();
        cache.set(ALL_CARS, "new".to_owned()).await.unwrap();

        assert_eq!(cache.get(ALL_CARS).await.unwrap().as_deref(), Some("new"));
    }
}
