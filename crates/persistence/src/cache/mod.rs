//! Two-tier cache: an in-process map in front of an optional Redis tier.
//!
//! Values are stored as JSON strings in both tiers. Remote failures are
//! logged and treated as misses; they never surface to callers.
//!
//! Stale-while-revalidate keeps a second copy of each value under
//! `"{key}::stale"` with a longer TTL, so prefix invalidation removes both.
//! Every delete or invalidation bumps a generation counter; a background
//! refresh that started before the bump discards its result.

mod memory;
mod remote;

pub use memory::MemoryTier;
pub use remote::{RedisCache, RemoteCache};

use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::metrics::{
    record_cache_hit, record_cache_invalidation, record_cache_miss, record_remote_cache_error,
    TIER_MEMORY, TIER_REMOTE,
};

const STALE_SUFFIX: &str = "::stale";

/// Cache failures. Only seen by the tiers; the public API swallows them.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Tuning for [`TwoTierCache`].
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub default_ttl: Duration,
    pub max_memory_items: usize,
    /// Stale copies live `ttl * stale_ttl_multiplier`.
    pub stale_ttl_multiplier: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(300),
            max_memory_items: 1000,
            stale_ttl_multiplier: 6,
        }
    }
}

/// Counters reported by [`TwoTierCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub memory_hits: u64,
    pub remote_hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub remote_enabled: bool,
}

/// Remote tier health for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    Disabled,
    Connected,
    Unreachable,
}

struct Inner {
    memory: MemoryTier,
    remote: Option<Arc<dyn RemoteCache>>,
    settings: CacheSettings,
    in_flight: Mutex<HashSet<String>>,
    generation: AtomicU64,
    memory_hits: AtomicU64,
    remote_hits: AtomicU64,
    misses: AtomicU64,
}

/// Shared cache handle. Cloning is cheap.
#[derive(Clone)]
pub struct TwoTierCache {
    inner: Arc<Inner>,
}

/// Removes a key from the in-flight set when the refresh ends, even on panic.
struct InFlightGuard {
    inner: Arc<Inner>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.inner.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}

fn stale_key(key: &str) -> String {
    format!("{}{}", key, STALE_SUFFIX)
}

impl TwoTierCache {
    pub fn new(settings: CacheSettings, remote: Option<Arc<dyn RemoteCache>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                memory: MemoryTier::new(settings.max_memory_items),
                remote,
                settings,
                in_flight: Mutex::new(HashSet::new()),
                generation: AtomicU64::new(0),
                memory_hits: AtomicU64::new(0),
                remote_hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }),
        }
    }

    /// Memory-only cache.
    pub fn in_memory(settings: CacheSettings) -> Self {
        Self::new(settings, None)
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.settings.default_ttl
    }

    /// Looks `key` up in both tiers without touching the hit/miss counters.
    /// Returns the value and the tier that served it.
    async fn lookup_raw(&self, key: &str) -> Option<(String, &'static str)> {
        if let Some(value) = self.inner.memory.get(key).await {
            return Some((value, TIER_MEMORY));
        }

        if let Some(remote) = &self.inner.remote {
            match remote.get(key).await {
                Ok(Some(value)) => {
                    self.inner
                        .memory
                        .set(key, value.clone(), self.inner.settings.default_ttl)
                        .await;
                    return Some((value, TIER_REMOTE));
                }
                Ok(None) => {}
                Err(e) => {
                    record_remote_cache_error("get");
                    tracing::warn!(key = %key, error = %e, "Remote cache read failed");
                }
            }
        }
        None
    }

    async fn get_raw(&self, key: &str) -> Option<String> {
        match self.lookup_raw(key).await {
            Some((value, tier)) => {
                let counter = if tier == TIER_MEMORY {
                    &self.inner.memory_hits
                } else {
                    &self.inner.remote_hits
                };
                counter.fetch_add(1, Ordering::Relaxed);
                record_cache_hit(tier);
                Some(value)
            }
            None => {
                self.inner.misses.fetch_add(1, Ordering::Relaxed);
                record_cache_miss();
                None
            }
        }
    }

    async fn decode<T: DeserializeOwned>(&self, key: &str, raw: &str) -> Option<T> {
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Dropping undecodable cache entry");
                self.delete(key).await;
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, value: String, ttl: Duration) {
        if let Some(remote) = &self.inner.remote {
            if let Err(e) = remote.set(key, &value, ttl).await {
                record_remote_cache_error("set");
                tracing::warn!(key = %key, error = %e, "Remote cache write failed");
            }
        }
        self.inner.memory.set(key, value, ttl).await;
    }

    /// Returns the cached value. Undecodable entries are dropped and count as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key).await?;
        self.decode(key, &raw).await
    }

    /// Reads a stale copy. Not reflected in [`TwoTierCache::stats`].
    async fn get_stale<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let stale = stale_key(key);
        let (raw, _) = self.lookup_raw(&stale).await?;
        self.decode(&stale, &raw).await
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set_raw(key, raw, ttl).await,
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to serialize cache value"),
        }
    }

    pub async fn delete(&self, key: &str) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.memory.delete(key).await;
        if let Some(remote) = &self.inner.remote {
            if let Err(e) = remote.delete(key).await {
                record_remote_cache_error("delete");
                tracing::warn!(key = %key, error = %e, "Remote cache delete failed");
            }
        }
    }

    /// Removes every key starting with `prefix` from both tiers.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let mut removed = self.inner.memory.delete_prefix(prefix).await;
        if let Some(remote) = &self.inner.remote {
            match remote.delete_prefix(prefix).await {
                Ok(count) => removed = removed.max(count),
                Err(e) => {
                    record_remote_cache_error("delete_prefix");
                    tracing::warn!(prefix = %prefix, error = %e, "Remote cache invalidation failed");
                }
            }
        }
        record_cache_invalidation(prefix, removed);
        tracing::debug!(prefix = %prefix, removed, "Cache prefix invalidated");
        removed
    }

    /// Read-through: returns the cached value or computes and stores it.
    /// Compute errors are returned and nothing is cached.
    pub async fn get_or_set<T, E, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }
        let value = compute().await?;
        self.set(key, &value, ttl).await;
        Ok(value)
    }

    /// Serves a fresh hit. Otherwise serves a stale copy and refreshes it in
    /// the background, or computes inline when there is nothing to serve.
    pub async fn get_stale_while_revalidate<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        E: Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if let Some(value) = self.get(key).await {
            return Ok(value);
        }

        if let Some(value) = self.get_stale::<T>(key).await {
            self.spawn_refresh(key.to_string(), ttl, compute);
            return Ok(value);
        }

        let value = compute().await?;
        self.store_fresh_and_stale(key, &value, ttl).await;
        Ok(value)
    }

    fn spawn_refresh<T, E, F, Fut>(&self, key: String, ttl: Duration, compute: F)
    where
        T: Serialize + Send + Sync + 'static,
        E: Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        {
            let Ok(mut in_flight) = self.inner.in_flight.lock() else {
                return;
            };
            if !in_flight.insert(key.clone()) {
                return;
            }
        }

        let cache = self.clone();
        let generation = self.inner.generation.load(Ordering::SeqCst);
        tokio::spawn(async move {
            let _guard = InFlightGuard {
                inner: cache.inner.clone(),
                key: key.clone(),
            };
            match compute().await {
                Ok(_) if cache.inner.generation.load(Ordering::SeqCst) != generation => {
                    tracing::debug!(key = %key, "Discarding refresh invalidated mid-flight");
                }
                Ok(value) => {
                    cache.store_fresh_and_stale(&key, &value, ttl).await;
                    tracing::debug!(key = %key, "Background cache refresh complete");
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "Background cache refresh failed"),
            }
        });
    }

    async fn store_fresh_and_stale<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let stale_ttl = ttl * self.inner.settings.stale_ttl_multiplier.max(1);
        self.set(key, value, ttl).await;
        self.set(&stale_key(key), value, stale_ttl).await;
    }

    /// Whether a background refresh for `key` is running.
    pub fn is_refreshing(&self, key: &str) -> bool {
        self.inner
            .in_flight
            .lock()
            .map(|set| set.contains(key))
            .unwrap_or(false)
    }

    /// Removes expired in-process entries, then trims to the size limit.
    pub async fn cleanup(&self) -> (usize, usize) {
        self.inner.memory.cleanup().await
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            memory_hits: self.inner.memory_hits.load(Ordering::Relaxed),
            remote_hits: self.inner.remote_hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            entries: self.inner.memory.len().await,
            remote_enabled: self.inner.remote.is_some(),
        }
    }

    pub async fn remote_status(&self) -> RemoteStatus {
        match &self.inner.remote {
            None => RemoteStatus::Disabled,
            Some(remote) => match remote.ping().await {
                Ok(()) => RemoteStatus::Connected,
                Err(e) => {
                    tracing::warn!(error = %e, "Remote cache ping failed");
                    RemoteStatus::Unreachable
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    /// Remote tier backed by a map, optionally failing every call.
    #[derive(Default)]
    struct FakeRemote {
        entries: Mutex<HashMap<String, String>>,
        broken: bool,
    }

    fn redis_down() -> CacheError {
        CacheError::Redis(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        )))
    }

    #[async_trait]
    impl RemoteCache for FakeRemote {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            if self.broken {
                return Err(redis_down());
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), CacheError> {
            if self.broken {
                return Err(redis_down());
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }

        async fn delete_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|k, _| !k.starts_with(prefix));
            Ok(before - entries.len())
        }

        async fn ping(&self) -> Result<(), CacheError> {
            if self.broken {
                Err(redis_down())
            } else {
                Ok(())
            }
        }
    }

    fn settings() -> CacheSettings {
        CacheSettings {
            default_ttl: Duration::from_secs(60),
            max_memory_items: 100,
            stale_ttl_multiplier: 10,
        }
    }

    #[tokio::test]
    async fn test_set_get_and_expire() {
        let cache = TwoTierCache::in_memory(settings());
        cache.set("k", &42u32, Duration::from_millis(30)).await;
        assert_eq!(cache.get::<u32>("k").await, Some(42));

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.cleanup().await;
        assert_eq!(cache.get::<u32>("k").await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.memory_hits, 1);
        assert_eq!(stats.misses, 1);
        assert!(!stats.remote_enabled);
    }

    #[tokio::test]
    async fn test_remote_hit_repopulates_memory() {
        let remote = Arc::new(FakeRemote::default());
        remote
            .entries
            .lock()
            .unwrap()
            .insert("shared".to_string(), "\"from-redis\"".to_string());
        let cache = TwoTierCache::new(settings(), Some(remote.clone()));

        assert_eq!(cache.get::<String>("shared").await.as_deref(), Some("from-redis"));
        remote.entries.lock().unwrap().clear();
        assert_eq!(cache.get::<String>("shared").await.as_deref(), Some("from-redis"));

        let stats = cache.stats().await;
        assert_eq!(stats.remote_hits, 1);
        assert_eq!(stats.memory_hits, 1);
    }

    #[tokio::test]
    async fn test_remote_failure_is_a_miss() {
        let remote = Arc::new(FakeRemote {
            broken: true,
            ..Default::default()
        });
        let cache = TwoTierCache::new(settings(), Some(remote));

        cache.set("k", &"v", Duration::from_secs(5)).await;
        assert_eq!(cache.get::<String>("k").await.as_deref(), Some("v"));
        assert_eq!(cache.get::<String>("missing").await, None);
        assert_eq!(cache.remote_status().await, RemoteStatus::Unreachable);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_hits_both_tiers() {
        let remote = Arc::new(FakeRemote::default());
        let cache = TwoTierCache::new(settings(), Some(remote.clone()));
        let ttl = Duration::from_secs(5);
        cache.set("vehicles:list:1", &1, ttl).await;
        cache.set("vehicles:detail:2", &2, ttl).await;
        cache.set("blog:list", &3, ttl).await;

        cache.invalidate_prefix("vehicles:").await;

        assert_eq!(cache.get::<i32>("vehicles:list:1").await, None);
        assert_eq!(cache.get::<i32>("blog:list").await, Some(3));
        assert_eq!(remote.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_set_computes_once() {
        let cache = TwoTierCache::in_memory(settings());
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let value: Result<String, String> = cache
                .get_or_set("k", Duration::from_secs(5), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("computed".to_string())
                })
                .await;
            assert_eq!(value.unwrap(), "computed");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_set_error_is_not_cached() {
        let cache = TwoTierCache::in_memory(settings());
        let result: Result<i32, String> = cache
            .get_or_set("k", Duration::from_secs(5), || async { Err("db down".to_string()) })
            .await;
        assert_eq!(result.unwrap_err(), "db down");
        assert_eq!(cache.get::<i32>("k").await, None);
    }

    #[tokio::test]
    async fn test_stale_while_revalidate() {
        let cache = TwoTierCache::in_memory(settings());
        let ttl = Duration::from_millis(30);

        let first: Result<i32, String> = cache
            .get_stale_while_revalidate("swr", ttl, || async { Ok(1) })
            .await;
        assert_eq!(first.unwrap(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;

        let served: Result<i32, String> = cache
            .get_stale_while_revalidate("swr", ttl, || async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(2)
            })
            .await;
        assert_eq!(served.unwrap(), 1);
        assert!(cache.is_refreshing("swr"));

        // A second caller does not start another refresh.
        let again: Result<i32, String> = cache
            .get_stale_while_revalidate("swr", ttl, || async { Ok(99) })
            .await;
        assert_eq!(again.unwrap(), 1);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!cache.is_refreshing("swr"));

        let refreshed: Result<i32, String> = cache
            .get_stale_while_revalidate("swr", ttl, || async { Ok(3) })
            .await;
        assert_eq!(refreshed.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stale_hit_counts_only_the_fresh_miss() {
        let cache = TwoTierCache::in_memory(settings());
        let ttl = Duration::from_millis(20);

        let _: Result<i32, String> = cache
            .get_stale_while_revalidate("k", ttl, || async { Ok(1) })
            .await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        let served: Result<i32, String> = cache
            .get_stale_while_revalidate("k", ttl, || async { Ok(2) })
            .await;
        assert_eq!(served.unwrap(), 1);

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.memory_hits, 0);
    }

    #[tokio::test]
    async fn test_invalidation_discards_running_refresh() {
        let cache = TwoTierCache::in_memory(settings());
        let ttl = Duration::from_millis(20);

        let _: Result<i32, String> = cache
            .get_stale_while_revalidate("vehicles:featured", ttl, || async { Ok(1) })
            .await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        let served: Result<i32, String> = cache
            .get_stale_while_revalidate("vehicles:featured", ttl, || async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(2)
            })
            .await;
        assert_eq!(served.unwrap(), 1);
        cache.invalidate_prefix("vehicles:").await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!cache.is_refreshing("vehicles:featured"));
        assert_eq!(cache.get::<i32>("vehicles:featured").await, None);
        assert_eq!(cache.get::<i32>("vehicles:featured::stale").await, None);
    }

    #[tokio::test]
    async fn test_stale_while_revalidate_failed_refresh_keeps_stale() {
        let cache = TwoTierCache::in_memory(settings());
        let ttl = Duration::from_millis(20);

        let _: Result<i32, String> = cache
            .get_stale_while_revalidate("k", ttl, || async { Ok(7) })
            .await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        let served: Result<i32, String> = cache
            .get_stale_while_revalidate("k", ttl, || async { Err("boom".to_string()) })
            .await;
        assert_eq!(served.unwrap(), 7);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(cache.get::<i32>("k::stale").await, Some(7));
    }
}
