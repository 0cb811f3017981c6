//! Admin API key lookups.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AdminApiKeyEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str =
    "id, key_hash, key_prefix, label, is_active, last_used_at, created_at, expires_at";

#[derive(Clone)]
pub struct AdminApiKeyRepository {
    pool: PgPool,
}

impl AdminApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<AdminApiKeyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_key_by_hash");
        let row = sqlx::query_as::<_, AdminApiKeyEntity>(&format!(
            "SELECT {COLUMNS} FROM admin_api_keys WHERE key_hash = $1"
        ))
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        row
    }

    /// Inserts the key, or reactivates it and clears its expiry if the hash
    /// is already known.
    pub async fn upsert(
        &self,
        key_hash: &str,
        key_prefix: &str,
        label: &str,
    ) -> Result<AdminApiKeyEntity, sqlx::Error> {
        sqlx::query_as::<_, AdminApiKeyEntity>(&format!(
            r#"
            INSERT INTO admin_api_keys (key_hash, key_prefix, label)
            VALUES ($1, $2, $3)
            ON CONFLICT (key_hash) DO UPDATE
                SET is_active = TRUE, label = EXCLUDED.label, expires_at = NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(key_hash)
        .bind(key_prefix)
        .bind(label)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn touch_last_used(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admin_api_keys SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
