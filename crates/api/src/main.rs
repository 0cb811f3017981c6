use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use dealership_api::app::{create_router, AppState};
use dealership_api::config::{CacheConfig, Config};
use dealership_api::jobs::{CacheCleanupJob, JobScheduler, PoolMetricsJob, RateLimitCleanupJob};
use dealership_api::middleware;
use dealership_api::services::admin_bootstrap::bootstrap_admin_key;
use persistence::cache::{RedisCache, RemoteCache, TwoTierCache};

/// Connects the Redis tier when configured. A failed connection falls back
/// to the in-process tier rather than stopping startup.
async fn build_cache(config: &CacheConfig) -> TwoTierCache {
    let settings = config.settings();
    let url = config.redis_url.trim();
    if !config.enabled || url.is_empty() {
        info!(enabled = config.enabled, "Using in-process cache only");
        return TwoTierCache::in_memory(settings);
    }

    match RedisCache::connect(url).await {
        Ok(redis) => {
            info!("Connected to Redis cache tier");
            let remote: Arc<dyn RemoteCache> = Arc::new(redis);
            TwoTierCache::new(settings, Some(remote))
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, using in-process cache only");
            TwoTierCache::in_memory(settings)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // `dealership generate-key` prints a fresh admin key for
    // DEALER__SECURITY__BOOTSTRAP_ADMIN_KEY and exits.
    if std::env::args().nth(1).as_deref() == Some("generate-key") {
        println!("{}", shared::crypto::generate_api_key());
        return Ok(());
    }

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting dealership API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&(&config.database).into()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    bootstrap_admin_key(&pool, &config.security.bootstrap_admin_key).await?;

    let cache = build_cache(&config.cache).await;
    let addr = config.socket_addr()?;
    let cleanup_every = Duration::from_secs(config.cache.cleanup_interval_secs);

    let state = AppState::new(config, pool.clone(), cache.clone());

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool));
    scheduler.register(CacheCleanupJob::new(cache, cleanup_every));
    if let Some(limiter) = state.contact_limiter.clone() {
        scheduler.register(RateLimitCleanupJob::new(limiter));
    }
    scheduler.start();

    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    info!("Server stopped");
    Ok(())
}
