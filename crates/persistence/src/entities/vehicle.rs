//! Vehicle entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::vehicle::{BodyType, FuelType, MakeCount, Transmission, VehicleStatus};

/// Column list shared by every vehicle query.
pub const VEHICLE_COLUMNS: &str = "id, stock_number, vin, make, model, trim_level, year, price, \
     mileage, fuel_type, transmission, body_type, exterior_color, interior_color, description, \
     images, features, status, featured, created_at, updated_at";

/// Database row mapping for the vehicles table.
#[derive(Debug, Clone, FromRow)]
pub struct VehicleEntity {
    pub id: Uuid,
    pub stock_number: String,
    pub vin: Option<String>,
    pub make: String,
    pub model: String,
    pub trim_level: Option<String>,
    pub year: i32,
    pub price: i64,
    pub mileage: i32,
    pub fuel_type: String,
    pub transmission: String,
    pub body_type: String,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub status: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleEntity {
    /// Convert to domain model.
    pub fn into_domain(self) -> domain::models::Vehicle {
        domain::models::Vehicle {
            id: self.id,
            stock_number: self.stock_number,
            vin: self.vin,
            make: self.make,
            model: self.model,
            trim: self.trim_level,
            year: self.year,
            price: self.price,
            mileage: self.mileage,
            fuel_type: self.fuel_type.parse().unwrap_or(FuelType::Gasoline),
            transmission: self.transmission.parse().unwrap_or(Transmission::Automatic),
            body_type: self.body_type.parse().unwrap_or(BodyType::Sedan),
            exterior_color: self.exterior_color,
            interior_color: self.interior_color,
            description: self.description,
            images: self.images,
            features: self.features,
            // Unknown status is hidden from the public catalog.
            status: self.status.parse().unwrap_or(VehicleStatus::Sold),
            featured: self.featured,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<VehicleEntity> for domain::models::Vehicle {
    fn from(entity: VehicleEntity) -> Self {
        entity.into_domain()
    }
}

/// Row for the distinct-makes query.
#[derive(Debug, Clone, FromRow)]
pub struct MakeCountEntity {
    pub make: String,
    pub count: i64,
}

impl From<MakeCountEntity> for MakeCount {
    fn from(row: MakeCountEntity) -> Self {
        MakeCount {
            make: row.make,
            count: row.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entity() -> VehicleEntity {
        VehicleEntity {
            id: Uuid::new_v4(),
            stock_number: "A1001".to_string(),
            vin: None,
            make: "Honda".to_string(),
            model: "CR-V".to_string(),
            trim_level: Some("EX".to_string()),
            year: 2022,
            price: 29_900,
            mileage: 12_000,
            fuel_type: "hybrid".to_string(),
            transmission: "cvt".to_string(),
            body_type: "suv".to_string(),
            exterior_color: None,
            interior_color: None,
            description: None,
            images: vec!["https://img.test/1.jpg".to_string()],
            features: vec![],
            status: "reserved".to_string(),
            featured: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let entity = create_test_entity();
        let vehicle: domain::models::Vehicle = entity.clone().into();
        assert_eq!(vehicle.id, entity.id);
        assert_eq!(vehicle.trim.as_deref(), Some("EX"));
        assert_eq!(vehicle.fuel_type, FuelType::Hybrid);
        assert_eq!(vehicle.transmission, Transmission::Cvt);
        assert_eq!(vehicle.body_type, BodyType::Suv);
        assert_eq!(vehicle.status, VehicleStatus::Reserved);
        assert_eq!(vehicle.title(), "2022 Honda CR-V EX");
    }

    #[test]
    fn test_unknown_status_is_not_available() {
        let mut entity = create_test_entity();
        entity.status = "archived".to_string();
        assert_eq!(entity.into_domain().status, VehicleStatus::Sold);
    }
}
