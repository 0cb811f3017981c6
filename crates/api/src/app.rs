use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::CustomerNotifier;
use persistence::cache::TwoTierCache;
use shared::pagination::PageRequest;

use crate::config::Config;
use crate::middleware::rate_limit::SharedContactLimiter;
use crate::middleware::{
    contact_rate_limit, metrics_handler, metrics_middleware, require_admin,
    security_headers_middleware, trace_id, ContactRateLimiter,
};
use crate::routes::{
    blog, health, inventory_alerts, leads, notifications, pricing, testimonials, vehicles,
};
use crate::services::{
    AlertMatcher, EmailService, LeadNotifier, ProviderNotifier, SmsService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub cache: TwoTierCache,
    pub contact_limiter: SharedContactLimiter,
    pub email: EmailService,
    pub sms: SmsService,
    pub leads: LeadNotifier,
    pub alert_matcher: AlertMatcher,
}

impl AppState {
    /// State wired to the real email/SMS providers.
    pub fn new(config: Config, pool: PgPool, cache: TwoTierCache) -> Self {
        let email = EmailService::new(config.email.clone());
        let sms = SmsService::new(config.sms.clone());
        let notifier = Arc::new(ProviderNotifier::new(email.clone(), sms.clone()));
        Self::build(config, pool, cache, email, sms, notifier)
    }

    /// State with a custom customer notifier for alert matches.
    pub fn with_notifier(
        config: Config,
        pool: PgPool,
        cache: TwoTierCache,
        notifier: Arc<dyn CustomerNotifier>,
    ) -> Self {
        let email = EmailService::new(config.email.clone());
        let sms = SmsService::new(config.sms.clone());
        Self::build(config, pool, cache, email, sms, notifier)
    }

    fn build(
        config: Config,
        pool: PgPool,
        cache: TwoTierCache,
        email: EmailService,
        sms: SmsService,
        notifier: Arc<dyn CustomerNotifier>,
    ) -> Self {
        let contact_limiter = ContactRateLimiter::new(
            config.security.contact_rate_limit,
            Duration::from_secs(config.security.contact_rate_window_secs),
        )
        .map(Arc::new);

        let leads = LeadNotifier::new(pool.clone(), email.clone(), sms.clone(), &config.dealership);
        let alert_matcher = AlertMatcher::new(
            pool.clone(),
            notifier,
            config.dealership.name.clone(),
            config.dealership.site_base_url.clone(),
        );

        Self {
            pool,
            config: Arc::new(config),
            cache,
            contact_limiter,
            email,
            sms,
            leads,
            alert_matcher,
        }
    }

    /// Page request clamped to the configured limits.
    pub fn page(&self, page: Option<i64>, limit: Option<i64>) -> PageRequest {
        PageRequest::new(
            page,
            limit,
            self.config.limits.default_page_size,
            self.config.limits.max_page_size,
        )
    }

    /// TTL for cached reads. Zero when caching is disabled, so entries
    /// expire on write and every read computes.
    pub fn cache_ttl(&self) -> Duration {
        if self.config.cache.enabled {
            self.cache.default_ttl()
        } else {
            Duration::ZERO
        }
    }
}

/// Builds the router with an in-process cache only.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let cache = TwoTierCache::in_memory(config.cache.settings());
    create_router(AppState::new(config, pool, cache))
}

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Contact form: per-IP rate limit
    let contact_routes = Router::new()
        .route("/api/contact", post(leads::submit_contact))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            contact_rate_limit,
        ));

    // Public site routes
    let public_routes = Router::new()
        .route("/api/vehicles", get(vehicles::list_vehicles))
        .route("/api/vehicles/featured", get(vehicles::featured_vehicles))
        .route("/api/vehicles/makes", get(vehicles::list_makes))
        .route("/api/vehicles/:id", get(vehicles::get_vehicle))
        .route("/api/vehicles/:id/similar", get(vehicles::similar_vehicles))
        .route("/api/vehicles/:id/inquiries", post(leads::submit_inquiry))
        .route(
            "/api/testimonials",
            get(testimonials::list_public).post(testimonials::submit),
        )
        .route("/api/testimonials/summary", get(testimonials::rating_summary))
        .route("/api/blog", get(blog::list_posts))
        .route("/api/blog/:slug", get(blog::get_post))
        .route(
            "/api/inventory-alerts",
            get(inventory_alerts::list_alerts).post(inventory_alerts::create_alert),
        )
        .route(
            "/api/inventory-alerts/:id",
            delete(inventory_alerts::deactivate_alert),
        );

    // Admin routes (require admin API key)
    let admin_routes = Router::new()
        .route("/api/admin/vehicles", post(vehicles::create_vehicle))
        .route(
            "/api/admin/vehicles/:id",
            patch(vehicles::update_vehicle).delete(vehicles::delete_vehicle),
        )
        .route(
            "/api/admin/vehicles/:id/status",
            patch(vehicles::update_vehicle_status),
        )
        .route("/api/admin/contacts", get(leads::list_contacts))
        .route("/api/admin/contacts/:id", patch(leads::update_contact))
        .route("/api/admin/inquiries", get(leads::list_inquiries))
        .route("/api/admin/inquiries/:id", patch(leads::update_inquiry))
        .route("/api/admin/testimonials", get(testimonials::list_for_admin))
        .route(
            "/api/admin/testimonials/:id",
            patch(testimonials::moderate).delete(testimonials::delete),
        )
        .route(
            "/api/admin/blog",
            get(blog::list_all_posts).post(blog::create_post),
        )
        .route(
            "/api/admin/blog/:id",
            patch(blog::update_post).delete(blog::delete_post),
        )
        .route(
            "/api/admin/inventory-alerts/match/:vehicle_id",
            post(inventory_alerts::run_match),
        )
        .route(
            "/api/admin/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/api/admin/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route(
            "/api/admin/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/admin/notifications/:id",
            delete(notifications::delete_notification),
        )
        .route(
            "/api/admin/notifications/:id/read",
            patch(notifications::mark_read),
        )
        .route(
            "/api/admin/pricing-rules",
            get(pricing::list_rules).post(pricing::create_rule),
        )
        .route(
            "/api/admin/pricing-rules/preview/:vehicle_id",
            get(pricing::preview),
        )
        .route(
            "/api/admin/pricing-rules/:id",
            get(pricing::get_rule)
                .patch(pricing::update_rule)
                .delete(pricing::delete_rule),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Health and metrics (no authentication)
    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(ops_routes)
        .merge(public_routes)
        .merge(contact_routes)
        .merge(admin_routes)
        // Outermost first
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(middleware::from_fn(trace_id))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(metrics_middleware))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(CompressionLayer::new())
                .layer(middleware::from_fn(security_headers_middleware))
                .layer(DefaultBodyLimit::max(config.server.max_body_size)),
        )
        .with_state(state)
}
