//! Prometheus series emitted by the persistence layer.
//!
//! Recording is a no-op until the API installs a recorder, so repositories
//! and the cache can call these unconditionally.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Cache tier label values.
pub const TIER_MEMORY: &str = "memory";
pub const TIER_REMOTE: &str = "remote";

pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("dealership_db_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("dealership_db_connections_idle").set(idle as f64);
    gauge!("dealership_db_connections_total").set(size as f64);
}

pub fn record_cache_hit(tier: &'static str) {
    counter!("dealership_cache_hits_total", "tier" => tier).increment(1);
}

/// A miss means neither tier had the key.
pub fn record_cache_miss() {
    counter!("dealership_cache_misses_total").increment(1);
}

/// Remote tier failures that were absorbed by falling back to memory.
pub fn record_remote_cache_error(operation: &'static str) {
    counter!("dealership_cache_remote_errors_total", "op" => operation).increment(1);
}

/// Entries dropped by a prefix invalidation after a write.
pub fn record_cache_invalidation(prefix: &str, removed: usize) {
    counter!("dealership_cache_invalidations_total", "prefix" => prefix.to_string()).increment(1);
    histogram!("dealership_cache_invalidated_entries").record(removed as f64);
}

/// Times one named repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_vehicle_by_id");
/// let row = sqlx::query_as::<_, VehicleEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        histogram!("dealership_db_query_duration_seconds", "query" => self.query)
            .record(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_cache_hit(TIER_MEMORY);
        record_cache_miss();
        record_remote_cache_error("get");
        record_cache_invalidation("vehicles:", 3);
        let timer = QueryTimer::new("list_vehicles");
        assert_eq!(timer.query, "list_vehicles");
        timer.record();
    }
}
