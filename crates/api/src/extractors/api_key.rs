//! Admin API key authentication.
//!
//! Keys look like `dk_<random>` and are stored only as a SHA-256 hash.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::AdminApiKeyRepository;
use shared::crypto::{is_well_formed_key, sha256_hex, API_KEY_PREFIX};

pub const API_KEY_HEADER: &str = "X-API-Key";

const INVALID_KEY: &str = "Invalid or missing API key";

/// An authenticated admin key.
///
/// Inserted into request extensions by `require_admin`, and also usable
/// directly as an extractor.
#[derive(Debug, Clone)]
pub struct AdminKey {
    pub key_id: Uuid,
    /// Display prefix, e.g. "dk_aBcDeFgH".
    pub key_prefix: String,
    pub label: String,
}

impl AdminKey {
    /// Checks a raw key against the stored hashes.
    pub async fn validate(pool: &PgPool, api_key: &str) -> Result<Self, ApiError> {
        if !is_well_formed_key(api_key) {
            return Err(ApiError::Unauthorized(INVALID_KEY.to_string()));
        }

        let repo = AdminApiKeyRepository::new(pool.clone());
        let key = repo
            .find_by_hash(&sha256_hex(api_key))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Admin key lookup failed");
                ApiError::ServiceUnavailable("Authentication service unavailable".to_string())
            })?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_KEY.to_string()))?;

        let now = Utc::now();
        if !key.is_usable_at(now) {
            let message = if key.is_active && key.is_expired_at(now) {
                "API key has expired"
            } else {
                INVALID_KEY
            };
            return Err(ApiError::Unauthorized(message.to_string()));
        }

        let key_id = key.id;
        tokio::spawn(async move {
            if let Err(e) = repo.touch_last_used(key_id).await {
                tracing::warn!(key_id = %key_id, error = %e, "Failed to record admin key use");
            }
        });

        Ok(AdminKey {
            key_id,
            key_prefix: format!("{}{}", API_KEY_PREFIX, key.key_prefix),
            label: key.label,
        })
    }
}

/// Reads the raw key from the request headers.
pub fn header_key(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<AdminKey>() {
            return Ok(auth.clone());
        }

        let api_key = header_key(parts)
            .ok_or_else(|| ApiError::Unauthorized(INVALID_KEY.to_string()))?
            .to_string();

        Self::validate(&state.pool, &api_key).await
    }
}
