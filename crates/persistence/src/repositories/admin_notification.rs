//! Admin notification repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::NewAdminNotification;
use shared::pagination::PageRequest;

use crate::entities::AdminNotificationEntity;
use crate::metrics::QueryTimer;

const NOTIFICATION_COLUMNS: &str =
    "id, kind, title, message, link, data, is_read, created_at, read_at";

#[derive(Clone)]
pub struct AdminNotificationRepository {
    pool: PgPool,
}

impl AdminNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &NewAdminNotification,
    ) -> Result<AdminNotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_admin_notification");
        let sql = format!(
            r#"
            INSERT INTO admin_notifications (kind, title, message, link, data)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        let result = sqlx::query_as::<_, AdminNotificationEntity>(&sql)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.message)
            .bind(input.link.as_deref())
            .bind(input.data.as_ref())
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn list(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<(Vec<AdminNotificationEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_admin_notifications");

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM admin_notifications WHERE (NOT $1 OR NOT is_read)",
        )
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {} FROM admin_notifications
            WHERE (NOT $1 OR NOT is_read)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
            NOTIFICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, AdminNotificationEntity>(&sql)
            .bind(unread_only)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((rows, total))
    }

    pub async fn unread_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM admin_notifications WHERE NOT is_read")
            .fetch_one(&self.pool)
            .await
    }

    /// Marks one notification read; `read_at` keeps its first value.
    pub async fn mark_read(&self, id: Uuid) -> Result<Option<AdminNotificationEntity>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE admin_notifications
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        sqlx::query_as::<_, AdminNotificationEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn mark_all_read(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admin_notifications SET is_read = TRUE, read_at = NOW() WHERE NOT is_read",
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admin_notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
