//! Admin notification entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::NotificationKind;

/// Database row mapping for the admin_notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminNotificationEntity {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<AdminNotificationEntity> for domain::models::AdminNotification {
    fn from(e: AdminNotificationEntity) -> Self {
        domain::models::AdminNotification {
            id: e.id,
            kind: e.kind.parse().unwrap_or(NotificationKind::System),
            title: e.title,
            message: e.message,
            link: e.link,
            data: e.data,
            is_read: e.is_read,
            created_at: e.created_at,
            read_at: e.read_at,
        }
    }
}
