//! Inventory alert entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::inventory_alert::AlertCriteria;

pub const ALERT_COLUMNS: &str = "id, email, name, phone, make, model, max_price, min_year, \
     max_mileage, body_type, fuel_type, is_active, last_notified_at, created_at, updated_at";

/// Database row mapping for the inventory_alerts table.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryAlertEntity {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub max_price: Option<i64>,
    pub min_year: Option<i32>,
    pub max_mileage: Option<i32>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub is_active: bool,
    pub last_notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryAlertEntity {
    pub fn into_domain(self) -> domain::models::InventoryAlert {
        domain::models::InventoryAlert {
            id: self.id,
            email: self.email,
            name: self.name,
            phone: self.phone,
            criteria: AlertCriteria {
                make: self.make,
                model: self.model,
                max_price: self.max_price,
                min_year: self.min_year,
                max_mileage: self.max_mileage,
                // Unparseable enum criteria are dropped rather than failing the row.
                body_type: self.body_type.and_then(|b| b.parse().ok()),
                fuel_type: self.fuel_type.and_then(|f| f.parse().ok()),
            },
            is_active: self.is_active,
            last_notified_at: self.last_notified_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<InventoryAlertEntity> for domain::models::InventoryAlert {
    fn from(entity: InventoryAlertEntity) -> Self {
        entity.into_domain()
    }
}
