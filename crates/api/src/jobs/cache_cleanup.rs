//! Evicts expired in-process cache entries and enforces the size limit.

use std::time::Duration;

use persistence::cache::TwoTierCache;

use super::scheduler::{Job, JobFrequency};

pub struct CacheCleanupJob {
    cache: TwoTierCache,
    every: Duration,
}

impl CacheCleanupJob {
    pub fn new(cache: TwoTierCache, every: Duration) -> Self {
        Self { cache, every }
    }
}

#[async_trait::async_trait]
impl Job for CacheCleanupJob {
    fn name(&self) -> &'static str {
        "cache_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Every(self.every)
    }

    async fn execute(&self) -> Result<(), String> {
        let (expired, trimmed) = self.cache.cleanup().await;
        if expired + trimmed > 0 {
            tracing::debug!(expired, trimmed, "Cache cleanup evicted entries");
        }
        let stats = self.cache.stats().await;
        metrics::gauge!("cache_entries").set(stats.entries as f64);
        Ok(())
    }
}
