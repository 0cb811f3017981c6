//! Per-client-IP rate limiting for the public contact form.
//!
//! Backed by a keyed `governor` limiter. A quota of `limit` per `window` is
//! expressed as a burst of `limit` that refills one slot every
//! `window / limit`, which approximates a fixed window without storing
//! window boundaries.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::Clock, DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::client_ip::ClientIp;

pub struct ContactRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    limit: u32,
    window: Duration,
}

impl ContactRateLimiter {
    /// Returns `None` when `limit` is 0 (limiting disabled).
    pub fn new(limit: u32, window: Duration) -> Option<Self> {
        let burst = NonZeroU32::new(limit)?;
        let window = window.max(Duration::from_secs(1));
        let quota = Quota::with_period(window / limit)?.allow_burst(burst);
        Some(Self {
            limiter: RateLimiter::keyed(quota),
            limit,
            window,
        })
    }

    /// `Err(retry_after_secs)` when `client` is over quota.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        match self.limiter.check_key(&client.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let clock = self.limiter.clock();
                let wait = not_until.wait_time_from(clock.now());
                Err(wait.as_secs().max(1))
            }
        }
    }

    /// Drops state for clients whose quota has fully replenished.
    pub fn retain_recent(&self) -> usize {
        self.limiter.retain_recent();
        self.limiter.len()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl std::fmt::Debug for ContactRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactRateLimiter")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .field("tracked_clients", &self.limiter.len())
            .finish()
    }
}

/// Route layer for `POST /api/contact`.
pub async fn contact_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(limiter) = state.contact_limiter.as_ref() {
        let client = ClientIp::from_headers(req.headers());
        if let Err(retry_after_secs) = limiter.check(&client.0) {
            tracing::warn!(client_ip = %client.0, retry_after_secs, "Contact form rate limited");
            return ApiError::RateLimited { retry_after_secs }.into_response();
        }
    }
    next.run(req).await
}

/// Shared handle stored in [`AppState`].
pub type SharedContactLimiter = Option<Arc<ContactRateLimiter>>;
