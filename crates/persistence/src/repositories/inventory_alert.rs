//! Inventory alert repository, including the alert matcher queries.
//!
//! Matching is a single SQL predicate over active alerts where every NULL
//! criterion places no constraint. It mirrors `AlertCriteria::matches`.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::inventory_alert::{AlertCriteria, CreateInventoryAlertRequest};
use domain::models::vehicle::Vehicle;

use crate::entities::inventory_alert::ALERT_COLUMNS;
use crate::entities::InventoryAlertEntity;
use crate::metrics::QueryTimer;

/// Alert-side predicate against a concrete vehicle. Parameters `$1..$7` are
/// make, model, price, year, mileage, body type, fuel type.
const MATCH_PREDICATE: &str = r#"
    is_active
    AND (make IS NULL OR LOWER(TRIM(make)) = LOWER(TRIM($1)))
    AND (model IS NULL OR LOWER(TRIM(model)) = LOWER(TRIM($2)))
    AND (max_price IS NULL OR $3 <= max_price)
    AND (min_year IS NULL OR $4 >= min_year)
    AND (max_mileage IS NULL OR $5 <= max_mileage)
    AND (body_type IS NULL OR body_type = $6)
    AND (fuel_type IS NULL OR fuel_type = $7)
"#;

/// Summary of a committed match batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedMatches {
    /// Alerts passed in.
    pub matched: usize,
    /// Rows actually inserted (already-notified pairs are skipped).
    pub inserted: usize,
}

/// Repository for inventory alert database operations.
#[derive(Clone)]
pub struct InventoryAlertRepository {
    pool: PgPool,
}

impl InventoryAlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        input: &CreateInventoryAlertRequest,
    ) -> Result<InventoryAlertEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_inventory_alert");
        let criteria = input.criteria();
        let sql = format!(
            r#"
            INSERT INTO inventory_alerts (
                email, name, phone, make, model, max_price, min_year,
                max_mileage, body_type, fuel_type
            )
            VALUES (LOWER(TRIM($1)), $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            ALERT_COLUMNS
        );
        let result = sqlx::query_as::<_, InventoryAlertEntity>(&sql)
            .bind(&input.email)
            .bind(input.name.as_deref().map(str::trim).filter(|s| !s.is_empty()))
            .bind(input.phone.as_deref().map(str::trim).filter(|s| !s.is_empty()))
            .bind(criteria.make.as_deref())
            .bind(criteria.model.as_deref())
            .bind(criteria.max_price)
            .bind(criteria.min_year)
            .bind(criteria.max_mileage)
            .bind(criteria.body_type.map(|v| v.as_str()))
            .bind(criteria.fuel_type.map(|v| v.as_str()))
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryAlertEntity>, sqlx::Error> {
        let sql = format!("SELECT {} FROM inventory_alerts WHERE id = $1", ALERT_COLUMNS);
        sqlx::query_as::<_, InventoryAlertEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Alerts for a customer email (case-insensitive), newest first.
    pub async fn list_by_email(
        &self,
        email: &str,
        include_inactive: bool,
    ) -> Result<Vec<InventoryAlertEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_alerts_by_email");
        let sql = format!(
            r#"
            SELECT {} FROM inventory_alerts
            WHERE LOWER(email) = LOWER(TRIM($1))
              AND ($2 OR is_active)
            ORDER BY created_at DESC
            "#,
            ALERT_COLUMNS
        );
        let result = sqlx::query_as::<_, InventoryAlertEntity>(&sql)
            .bind(email)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Deactivates an alert. Returns false when it does not exist.
    pub async fn deactivate(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE inventory_alerts SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All active alerts whose criteria hold for `vehicle`, oldest first.
    ///
    /// Vehicle availability is the caller's concern.
    pub async fn find_matching_alerts(
        &self,
        vehicle: &Vehicle,
    ) -> Result<Vec<InventoryAlertEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_matching_alerts");
        let sql = format!(
            "SELECT {} FROM inventory_alerts WHERE {} ORDER BY created_at, id",
            ALERT_COLUMNS, MATCH_PREDICATE
        );
        let result = sqlx::query_as::<_, InventoryAlertEntity>(&sql)
            .bind(&vehicle.make)
            .bind(&vehicle.model)
            .bind(vehicle.price)
            .bind(vehicle.year)
            .bind(vehicle.mileage)
            .bind(vehicle.body_type.as_str())
            .bind(vehicle.fuel_type.as_str())
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Writes one notification row per alert for `vehicle_id` in a single
    /// transaction and bumps each alert's `last_notified_at`.
    ///
    /// Pairs already notified are skipped. Any error rolls back the batch.
    /// Returns the alerts that were newly notified.
    pub async fn record_matches(
        &self,
        vehicle_id: Uuid,
        alert_ids: &[Uuid],
    ) -> Result<(RecordedMatches, Vec<Uuid>), sqlx::Error> {
        let timer = QueryTimer::new("record_alert_matches");
        let mut tx = self.pool.begin().await?;
        let mut newly_notified = Vec::with_capacity(alert_ids.len());

        for alert_id in alert_ids {
            let inserted = sqlx::query(
                r#"
                INSERT INTO alert_notifications (alert_id, vehicle_id)
                VALUES ($1, $2)
                ON CONFLICT (alert_id, vehicle_id) DO NOTHING
                "#,
            )
            .bind(alert_id)
            .bind(vehicle_id)
            .execute(&mut *tx)
            .await?;

            if inserted.rows_affected() > 0 {
                sqlx::query("UPDATE inventory_alerts SET last_notified_at = NOW() WHERE id = $1")
                    .bind(alert_id)
                    .execute(&mut *tx)
                    .await?;
                newly_notified.push(*alert_id);
            }
        }

        tx.commit().await?;
        timer.record();

        Ok((
            RecordedMatches {
                matched: alert_ids.len(),
                inserted: newly_notified.len(),
            },
            newly_notified,
        ))
    }

    /// Number of available vehicles the criteria already match.
    pub async fn count_available_matches(&self, criteria: &AlertCriteria) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_available_matches");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM vehicles
            WHERE status = 'available'
              AND ($1::text IS NULL OR LOWER(make) = LOWER(TRIM($1)))
              AND ($2::text IS NULL OR LOWER(model) = LOWER(TRIM($2)))
              AND ($3::bigint IS NULL OR price <= $3)
              AND ($4::int IS NULL OR year >= $4)
              AND ($5::int IS NULL OR mileage <= $5)
              AND ($6::text IS NULL OR body_type = $6)
              AND ($7::text IS NULL OR fuel_type = $7)
            "#,
        )
        .bind(criteria.make.as_deref())
        .bind(criteria.model.as_deref())
        .bind(criteria.max_price)
        .bind(criteria.min_year)
        .bind(criteria.max_mileage)
        .bind(criteria.body_type.map(|v| v.as_str()))
        .bind(criteria.fuel_type.map(|v| v.as_str()))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
