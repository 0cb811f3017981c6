//! HTTP route handlers.

pub mod blog;
pub mod health;
pub mod inventory_alerts;
pub mod leads;
pub mod notifications;
pub mod pricing;
pub mod testimonials;
pub mod vehicles;

use serde::{Deserialize, Serialize};
use shared::pagination::PageMeta;

/// A page of results as stored in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPage<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Cache key prefixes. Mutations invalidate the whole prefix.
pub mod cache_keys {
    pub const VEHICLES: &str = "vehicles:";
    pub const TESTIMONIALS: &str = "testimonials:";
    pub const BLOG: &str = "blog:";
}
