//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use persistence::cache::{CacheStats, RemoteStatus};
use persistence::db;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub cache: CacheHealth,
    pub integrations: IntegrationsHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Cache tiers. An unreachable Redis degrades to memory only and does not
/// fail the check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheHealth {
    pub remote: RemoteStatus,
    pub stats: CacheStats,
}

/// Outbound providers; `false` means sends are skipped, not that they fail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IntegrationsHealth {
    pub email_configured: bool,
    pub email_provider: String,
    pub sms_configured: bool,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

fn overall_status(db_connected: bool, remote: RemoteStatus) -> &'static str {
    match (db_connected, remote) {
        (false, _) => "unhealthy",
        (true, RemoteStatus::Unreachable) => "degraded",
        (true, _) => "healthy",
    }
}

/// GET /api/health
///
/// Database connectivity, cache tier status and integration status.
/// Returns 503 only when the database is down.
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let latency = db::ping(&state.pool).await;
    let db_connected = latency.is_some();

    let remote = state.cache.remote_status().await;
    let stats = state.cache.stats().await;

    let response = HealthResponse {
        status: overall_status(db_connected, remote).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            connected: db_connected,
            latency_ms: latency.map(|d| d.as_millis() as u64),
        },
        cache: CacheHealth { remote, stats },
        integrations: IntegrationsHealth {
            email_configured: state.email.is_configured(),
            email_provider: state.email.provider().to_string(),
            sms_configured: state.sms.is_configured(),
        },
    };

    let status = if db_connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// GET /api/health/live
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// GET /api/health/ready
///
/// Returns 200 OK if the service can accept traffic (database connected).
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    if db::ping(&state.pool).await.is_some() {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
