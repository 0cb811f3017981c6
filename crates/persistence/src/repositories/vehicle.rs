//! Vehicle repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::vehicle::{
    CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleFilters, VehicleSort,
    VehicleStatus,
};
use shared::pagination::PageRequest;

use crate::entities::vehicle::VEHICLE_COLUMNS;
use crate::entities::{MakeCountEntity, VehicleEntity};
use crate::metrics::QueryTimer;

/// Catalog listing parameters.
#[derive(Debug, Clone)]
pub struct VehicleListParams {
    pub filters: VehicleFilters,
    pub status: VehicleStatus,
    pub featured: Option<bool>,
    pub sort: VehicleSort,
    pub page: PageRequest,
}

/// Shared WHERE clause for listing and counting. `$1` is status.
const LIST_WHERE: &str = r#"
    WHERE status = $1
      AND ($2::bool IS NULL OR featured = $2)
      AND ($3::text IS NULL OR LOWER(make) = LOWER($3))
      AND ($4::text IS NULL OR LOWER(model) = LOWER($4))
      AND ($5::bigint IS NULL OR price >= $5)
      AND ($6::bigint IS NULL OR price <= $6)
      AND ($7::int IS NULL OR year >= $7)
      AND ($8::int IS NULL OR year <= $8)
      AND ($9::int IS NULL OR mileage <= $9)
      AND ($10::text IS NULL OR fuel_type = $10)
      AND ($11::text IS NULL OR transmission = $11)
      AND ($12::text IS NULL OR body_type = $12)
      AND ($13::text IS NULL OR (
            make ILIKE $13 OR model ILIKE $13
            OR COALESCE(trim_level, '') ILIKE $13
            OR COALESCE(description, '') ILIKE $13))
"#;

/// Binds the `LIST_WHERE` parameters in order.
macro_rules! bind_list_filters {
    ($query:expr, $params:expr) => {{
        let f = &$params.filters;
        $query
            .bind($params.status.as_str())
            .bind($params.featured)
            .bind(f.make.as_deref())
            .bind(f.model.as_deref())
            .bind(f.min_price)
            .bind(f.max_price)
            .bind(f.min_year)
            .bind(f.max_year)
            .bind(f.max_mileage)
            .bind(f.fuel_type.map(|v| v.as_str()))
            .bind(f.transmission.map(|v| v.as_str()))
            .bind(f.body_type.map(|v| v.as_str()))
            .bind(f.q.as_deref().map(like_pattern))
    }};
}

/// `%term%` for ILIKE with `\`, `%` and `_` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Repository for vehicle database operations.
#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    /// Creates a new VehicleRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a vehicle. Unique violations (stock number, VIN) bubble up.
    pub async fn create(&self, input: &CreateVehicleRequest) -> Result<VehicleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_vehicle");
        let sql = format!(
            r#"
            INSERT INTO vehicles (
                stock_number, vin, make, model, trim_level, year, price, mileage,
                fuel_type, transmission, body_type, exterior_color, interior_color,
                description, images, features, status, featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        );
        let result = sqlx::query_as::<_, VehicleEntity>(&sql)
            .bind(input.stock_number.trim())
            .bind(input.vin.as_deref().map(str::to_uppercase))
            .bind(input.make.trim())
            .bind(input.model.trim())
            .bind(input.trim.as_deref())
            .bind(input.year)
            .bind(input.price)
            .bind(input.mileage)
            .bind(input.fuel_type.as_str())
            .bind(input.transmission.as_str())
            .bind(input.body_type.as_str())
            .bind(input.exterior_color.as_deref())
            .bind(input.interior_color.as_deref())
            .bind(input.description.as_deref())
            .bind(&input.images)
            .bind(&input.features)
            .bind(input.status.as_str())
            .bind(input.featured)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VehicleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_vehicle_by_id");
        let sql = format!("SELECT {} FROM vehicles WHERE id = $1", VEHICLE_COLUMNS);
        let result = sqlx::query_as::<_, VehicleEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Filtered, sorted, paginated listing. Returns the page and the total count.
    pub async fn list(
        &self,
        params: &VehicleListParams,
    ) -> Result<(Vec<VehicleEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_vehicles");

        let count_sql = format!("SELECT COUNT(*) FROM vehicles {}", LIST_WHERE);
        let total: i64 = bind_list_filters!(sqlx::query_scalar::<_, i64>(&count_sql), params)
            .fetch_one(&self.pool)
            .await?;

        // ORDER BY comes from a fixed set of static strings.
        let list_sql = format!(
            "SELECT {} FROM vehicles {} ORDER BY {} LIMIT $14 OFFSET $15",
            VEHICLE_COLUMNS,
            LIST_WHERE,
            params.sort.order_by()
        );
        let rows = bind_list_filters!(sqlx::query_as::<_, VehicleEntity>(&list_sql), params)
            .bind(params.page.limit)
            .bind(params.page.offset())
            .fetch_all(&self.pool)
            .await?;

        timer.record();
        Ok((rows, total))
    }

    /// Available featured vehicles, newest first.
    pub async fn featured(&self, limit: i64) -> Result<Vec<VehicleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("featured_vehicles");
        let sql = format!(
            r#"
            SELECT {} FROM vehicles
            WHERE status = 'available' AND featured
            ORDER BY created_at DESC, id
            LIMIT $1
            "#,
            VEHICLE_COLUMNS
        );
        let result = sqlx::query_as::<_, VehicleEntity>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Distinct makes with counts of available stock, alphabetical.
    pub async fn makes(&self) -> Result<Vec<MakeCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("vehicle_makes");
        let result = sqlx::query_as::<_, MakeCountEntity>(
            r#"
            SELECT MIN(make) AS make, COUNT(*) AS count
            FROM vehicles
            WHERE status = 'available'
            GROUP BY LOWER(make)
            ORDER BY LOWER(make)
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Available vehicles sharing body type or make, priced within `min..=max`.
    pub async fn similar(
        &self,
        vehicle: &Vehicle,
        min_price: i64,
        max_price: i64,
        limit: i64,
    ) -> Result<Vec<VehicleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("similar_vehicles");
        let sql = format!(
            r#"
            SELECT {} FROM vehicles
            WHERE status = 'available'
              AND id <> $1
              AND (body_type = $2 OR LOWER(make) = LOWER($3))
              AND price BETWEEN $4 AND $5
            ORDER BY ABS(price - $6), created_at DESC
            LIMIT $7
            "#,
            VEHICLE_COLUMNS
        );
        let result = sqlx::query_as::<_, VehicleEntity>(&sql)
            .bind(vehicle.id)
            .bind(vehicle.body_type.as_str())
            .bind(&vehicle.make)
            .bind(min_price)
            .bind(max_price)
            .bind(vehicle.price)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateVehicleRequest,
    ) -> Result<Option<VehicleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_vehicle");
        let sql = format!(
            r#"
            UPDATE vehicles SET
                make = COALESCE($2, make),
                model = COALESCE($3, model),
                trim_level = COALESCE($4, trim_level),
                year = COALESCE($5, year),
                price = COALESCE($6, price),
                mileage = COALESCE($7, mileage),
                fuel_type = COALESCE($8, fuel_type),
                transmission = COALESCE($9, transmission),
                body_type = COALESCE($10, body_type),
                exterior_color = COALESCE($11, exterior_color),
                interior_color = COALESCE($12, interior_color),
                description = COALESCE($13, description),
                images = COALESCE($14, images),
                features = COALESCE($15, features),
                featured = COALESCE($16, featured)
            WHERE id = $1
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        );
        let result = sqlx::query_as::<_, VehicleEntity>(&sql)
            .bind(id)
            .bind(input.make.as_deref().map(str::trim))
            .bind(input.model.as_deref().map(str::trim))
            .bind(input.trim.as_deref())
            .bind(input.year)
            .bind(input.price)
            .bind(input.mileage)
            .bind(input.fuel_type.map(|v| v.as_str()))
            .bind(input.transmission.map(|v| v.as_str()))
            .bind(input.body_type.map(|v| v.as_str()))
            .bind(input.exterior_color.as_deref())
            .bind(input.interior_color.as_deref())
            .bind(input.description.as_deref())
            .bind(input.images.as_ref())
            .bind(input.features.as_ref())
            .bind(input.featured)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Sets the status, returning the updated row and the previous status.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
    ) -> Result<Option<(VehicleEntity, String)>, sqlx::Error> {
        let timer = QueryTimer::new("update_vehicle_status");
        let mut tx = self.pool.begin().await?;

        let previous: Option<String> =
            sqlx::query_scalar("SELECT status FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(previous) = previous else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        let sql = format!(
            "UPDATE vehicles SET status = $2 WHERE id = $1 RETURNING {}",
            VEHICLE_COLUMNS
        );
        let entity = sqlx::query_as::<_, VehicleEntity>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some((entity, previous)))
    }
}
