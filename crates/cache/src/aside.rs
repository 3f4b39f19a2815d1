//! Get-or-compute read path over a [`Cache`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Cache;

/// Cache-aside wrapper: look up, compute on miss, store with a fixed TTL.
///
/// Writes elsewhere never purge entries here; readers may see a value up to
/// `ttl` old. Concurrent misses on one key each compute and the last write wins.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Return the cached value for `key`, or run `compute` and cache its result.
    ///
    /// Cache failures degrade to a miss; only `compute` errors reach the caller,
    /// and they are never cached.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: &str, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    return Ok(value);
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "discarding undecodable cache entry");
                }
            },
            Ok(None) => tracing::debug!(key, "cache miss"),
            Err(err) => tracing::warn!(key, error = %err, "cache read failed, computing"),
        }

        let value = compute().await?;

        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(err) = self.cache.set(key, raw, self.ttl).await {
                    tracing::warn!(key, error = %err, "cache write failed");
                }
            }
            Err(err) => tracing::warn!(key, error = %err, "cache value could not be encoded"),
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CacheError, CacheResult};
    use crate::MemoryCache;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    struct BrokenCache;

    #[async_trait]
    impl Cache for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Ok(())
        }
    }

    fn aside() -> (CacheAside, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new(16));
        (CacheAside::new(cache.clone(), TTL), cache)
    }

    #[tokio::test]
    async fn test_miss_computes_and_stores() {
        let (aside, cache) = aside();
        let calls = AtomicUsize::new(0);

        let value: Result<Vec<i64>, String> = aside
            .get_or_compute("nums", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await;

        assert_eq!(value.unwrap(), vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("nums").await.unwrap().as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn test_hit_skips_compute() {
        let (aside, cache) = aside();
        cache.set("nums", "[7]".to_string(), TTL).await.unwrap();
        let calls = AtomicUsize::new(0);

        let value: Result<Vec<i64>, String> = aside
            .get_or_compute("nums", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![0])
            })
            .await;

        assert_eq!(value.unwrap(), vec![7]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_compute_error_is_not_cached() {
        let (aside, cache) = aside();

        let failed: Result<Vec<i64>, String> = aside
            .get_or_compute("nums", || async { Err("store down".to_string()) })
            .await;

        assert_eq!(failed.unwrap_err(), "store down");
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_recomputed() {
        let (aside, cache) = aside();
        cache.set("nums", "not json".to_string(), TTL).await.unwrap();

        let value: Result<Vec<i64>, String> =
            aside.get_or_compute("nums", || async { Ok(vec![9]) }).await;

        assert_eq!(value.unwrap(), vec![9]);
        assert_eq!(cache.get("nums").await.unwrap().as_deref(), Some("[9]"));
    }

    #[tokio::test]
    async fn test_broken_backend_degrades_to_compute() {
        let aside = CacheAside::new(Arc::new(BrokenCache), TTL);

        let value: Result<u32, String> = aside.get_or_compute("n", || async { Ok(5) }).await;

        assert_eq!(value.unwrap(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_recomputed_after_ttl() {
        let (aside, _cache) = aside();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let compute =
            move || async move { Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) as u32) };

        assert_eq!(aside.get_or_compute("n", compute).await.unwrap(), 0);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(aside.get_or_compute("n", compute).await.unwrap(), 0);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(aside.get_or_compute("n", compute).await.unwrap(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
