//! Forgets contact-form clients whose quota has fully replenished.

use std::sync::Arc;

use crate::middleware::rate_limit::ContactRateLimiter;

use super::scheduler::{Job, JobFrequency};

pub struct RateLimitCleanupJob {
    limiter: Arc<ContactRateLimiter>,
}

impl RateLimitCleanupJob {
    pub fn new(limiter: Arc<ContactRateLimiter>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimitCleanupJob {
    fn name(&self) -> &'static str {
        "rate_limit_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(5)
    }

    async fn execute(&self) -> Result<(), String> {
        let tracked = self.limiter.retain_recent();
        tracing::debug!(tracked, "Contact rate limiter pruned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_rate_limit_cleanup_runs() {
        let limiter = Arc::new(ContactRateLimiter::new(5, Duration::from_secs(60)).unwrap());
        limiter.check("203.0.113.9").unwrap();
        let job = RateLimitCleanupJob::new(limiter);
        assert_eq!(job.name(), "rate_limit_cleanup");
        assert!(job.execute().await.is_ok());
    }
}
