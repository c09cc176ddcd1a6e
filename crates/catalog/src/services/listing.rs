//! Cache-aside read path for the listing endpoints.
//!
//! Mutations never evict or refresh listing entries; readers may observe a
//! listing up to one TTL window stale after a write. That bounded-staleness
//! contract is deliberate and matches the cache configuration in
//! [`crate::cache`].

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::ListingCache;
use crate::db::RepositoryError;

/// Serve a listing through the cache, falling back to the database.
///
/// 1. On a cache hit with a payload that deserializes, the snapshot is
///    returned without touching the database.
/// 2. A corrupted payload or a cache backend fault is absorbed: it is logged
///    and treated exactly like a miss.
/// 3. On the fallback path `fetch` queries the database; a database failure
///    is the only error this function surfaces.
/// 4. The fresh listing is re-cached best-effort. Serialization or cache-set
///    failures are logged and swallowed, never failing the request.
///
/// Two concurrent misses may both fetch and both write; the set is
/// idempotent so this only duplicates work.
///
/// # Errors
///
/// Returns `RepositoryError` only when `fetch` itself fails.
pub async fn cached_listing<T, F, Fut>(
    cache: &dyn ListingCache,
    key: &'static str,
    fetch: F,
) -> Result<Vec<T>, RepositoryError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, RepositoryError>>,
{
    match cache.get(key).await {
        Ok(Some(payload)) => match serde_json::from_str::<Vec<T>>(&payload) {
            Ok(items) => {
                tracing::debug!(key, "serving listing from cache");
                return Ok(items);
            }
            Err(err) => {
                tracing::warn!(key, %err, "corrupted cache payload, falling back to database");
            }
        },
        Ok(None) => tracing::debug!(key, "cache miss"),
        Err(err) => {
            tracing::warn!(key, %err, "cache unavailable, falling back to database");
        }
    }

    let items = fetch().await?;

    match serde_json::to_string(&items) {
        Ok(payload) => {
            if let Err(err) = cache.set(key, payload).await {
                tracing::warn!(key, %err, "failed to repopulate listing cache");
            }
        }
        Err(err) => {
            tracing::warn!(key, %err, "failed to serialize listing for cache");
        }
    }

    tracing::debug!(key, "serving listing from database");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde::Deserialize;

    use super::*;
    use crate::cache::CacheError;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Item {
        id: i32,
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                name: "Toyota".to_owned(),
            },
            Item {
                id: 2,
                name: "Honda".to_owned(),
            },
        ]
    }

    /// Plain in-memory fake, no TTL.
    #[derive(Default)]
    struct FakeCache {
        entries: Mutex<HashMap<String, String>>,
    }

    impl FakeCache {
        fn preloaded(key: &str, payload: &str) -> Self {
            let cache = Self::default();
            cache
                .entries
                .lock()
                .unwrap()
                .insert(key.to_owned(), payload.to_owned());
            cache
        }

        fn stored(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl ListingCache for FakeCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, payload: String) -> Result<(), CacheError> {
            self.entries.lock().unwrap().insert(key.to_owned(), payload);
            Ok(())
        }
    }

    /// Fake whose every operation fails at the backend level.
    struct BrokenCache;

    #[async_trait]
    impl ListingCache for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Backend("connection refused".to_owned()))
        }

        async fn set(&self, _key: &str, _payload: String) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".to_owned()))
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let payload = serde_json::to_string(&items()).unwrap();
        let cache = FakeCache::preloaded("all_makes", &payload);
        let calls = AtomicUsize::new(0);

        let got = cached_listing::<Item, _, _>(&cache, "all_makes", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        })
        .await
        .unwrap();

        assert_eq!(got, items());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_repopulates_losslessly() {
        let cache = FakeCache::default();

        let got = cached_listing(&cache, "all_makes", || async { Ok(items()) })
            .await
            .unwrap();
        assert_eq!(got, items());

        // The stored snapshot must round-trip back to the same listing.
        let stored = cache.stored("all_makes").expect("listing was not cached");
        let reread: Vec<Item> = serde_json::from_str(&stored).unwrap();
        assert_eq!(reread, items());
    }

    #[tokio::test]
    async fn test_corrupted_payload_falls_back_and_overwrites() {
        let cache = FakeCache::preloaded("all_cars", "{not json!");
        let calls = AtomicUsize::new(0);

        let got = cached_listing(&cache, "all_cars", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(items())
        })
        .await
        .unwrap();

        assert_eq!(got, items());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stored = cache.stored("all_cars").unwrap();
        let reread: Vec<Item> = serde_json::from_str(&stored).unwrap();
        assert_eq!(reread, items());
    }

    #[tokio::test]
    async fn test_cache_fault_degrades_to_fetch() {
        let got = cached_listing(&BrokenCache, "all_makes", || async { Ok(items()) })
            .await
            .unwrap();

        // Both the failed get and the failed set are absorbed.
        assert_eq!(got, items());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal() {
        let cache = FakeCache::default();

        let result = cached_listing::<Item, _, _>(&cache, "all_makes", || async {
            Err(RepositoryError::DataCorruption("boom".to_owned()))
        })
        .await;

        assert!(result.is_err());
        assert!(cache.stored("all_makes").is_none());
    }
}
