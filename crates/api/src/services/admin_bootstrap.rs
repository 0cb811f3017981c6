//! Upserts the configured bootstrap admin key on startup.
//!
//! Idempotent: re-running with the same key reactivates it and clears any
//! expiry, so a locked-out deployment can always recover through config.

use shared::crypto::{extract_key_prefix, sha256_hex};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use persistence::repositories::AdminApiKeyRepository;

const BOOTSTRAP_KEY_LABEL: &str = "bootstrap";

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Returns the key's id, or `None` when no key is configured.
pub async fn bootstrap_admin_key(pool: &PgPool, raw_key: &str) -> Result<Option<Uuid>, BootstrapError> {
    let raw_key = raw_key.trim();
    if raw_key.is_empty() {
        return Ok(None);
    }

    let prefix = extract_key_prefix(raw_key).ok_or_else(|| {
        BootstrapError::Config(
            "bootstrap_admin_key must start with dk_ followed by at least 8 characters".to_string(),
        )
    })?;

    let key = AdminApiKeyRepository::new(pool.clone())
        .upsert(&sha256_hex(raw_key), prefix, BOOTSTRAP_KEY_LABEL)
        .await?;

    info!(
        key_id = %key.id,
        api_key_prefix = %format!("dk_{}", prefix),
        "Bootstrap admin key ready"
    );
    warn!("SECURITY: the bootstrap key stays valid until removed from config; rotate it with `dealership generate-key`");

    Ok(Some(key.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_key_is_skipped() {
        let id = tokio_test::assert_ok!(bootstrap_admin_key(&lazy_pool(), "  ").await);
        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn test_malformed_key_is_config_error() {
        let err = tokio_test::assert_err!(bootstrap_admin_key(&lazy_pool(), "dk_short").await);
        assert!(matches!(err, BootstrapError::Config(_)));
    }
}
