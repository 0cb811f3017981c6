//! Background job scheduler and job implementations.

mod cache_cleanup;
mod pool_metrics;
mod rate_limit_cleanup;
mod scheduler;

pub use cache_cleanup::CacheCleanupJob;
pub use pool_metrics::PoolMetricsJob;
pub use rate_limit_cleanup::RateLimitCleanupJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
