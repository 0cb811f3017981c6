//! Admin API key row.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AdminApiKeyEntity {
    pub id: Uuid,
    /// Hex SHA-256 of the full key; the raw key is never stored.
    pub key_hash: String,
    /// First characters after `dk_`, for display in logs.
    pub key_prefix: String,
    pub label: String,
    pub is_active: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AdminApiKeyEntity {
    /// Active and not past `expires_at` (an expiry equal to `at` still counts).
    pub fn is_usable_at(&self, at: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires| expires >= at)
    }

    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires < at)
    }
}
