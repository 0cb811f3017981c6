//! Vehicle domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{
    validate_image_urls, validate_model_year, validate_positive_price, validate_vin,
};

// ============================================================================
// Enums
// ============================================================================

text_enum! {
    /// Fuel / powertrain type.
    FuelType {
        Gasoline => "gasoline",
        Diesel => "diesel",
        Hybrid => "hybrid",
        Electric => "electric",
        PlugInHybrid => "plug_in_hybrid",
    }
}

text_enum! {
    /// Transmission type.
    Transmission {
        Automatic => "automatic",
        Manual => "manual",
        Cvt => "cvt",
    }
}

text_enum! {
    /// Body style.
    BodyType {
        Sedan => "sedan",
        Suv => "suv",
        Truck => "truck",
        Coupe => "coupe",
        Hatchback => "hatchback",
        Convertible => "convertible",
        Wagon => "wagon",
        Van => "van",
    }
}

text_enum! {
    /// Listing status. Vehicles are never deleted, only moved to `sold`.
    VehicleStatus {
        Available => "available",
        Reserved => "reserved",
        Sold => "sold",
    }
}

impl VehicleStatus {
    /// True when moving from `self` to `target` puts the vehicle (back) on the lot.
    pub fn becomes_available(&self, target: VehicleStatus) -> bool {
        *self != VehicleStatus::Available && target == VehicleStatus::Available
    }
}

text_enum! {
    /// Sort orders for catalog listings.
    VehicleSort {
        Newest => "newest",
        PriceAsc => "price_asc",
        PriceDesc => "price_desc",
        YearDesc => "year_desc",
        MileageAsc => "mileage_asc",
    }
}

impl VehicleSort {
    /// SQL `ORDER BY` clause for this sort. Only static strings, never user input.
    pub fn order_by(&self) -> &'static str {
        match self {
            VehicleSort::Newest => "created_at DESC, id",
            VehicleSort::PriceAsc => "price ASC, id",
            VehicleSort::PriceDesc => "price DESC, id",
            VehicleSort::YearDesc => "year DESC, created_at DESC, id",
            VehicleSort::MileageAsc => "mileage ASC, id",
        }
    }
}

impl Default for VehicleSort {
    fn default() -> Self {
        VehicleSort::Newest
    }
}

// ============================================================================
// Core Model
// ============================================================================

/// A vehicle listed in the dealership catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub stock_number: String,
    pub vin: Option<String>,
    pub make: String,
    pub model: String,
    pub trim: Option<String>,
    pub year: i32,
    pub price: i64,
    pub mileage: i32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub body_type: BodyType,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub status: VehicleStatus,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Display title, e.g. "2021 Toyota RAV4 XLE".
    pub fn title(&self) -> String {
        match &self.trim {
            Some(trim) if !trim.is_empty() => {
                format!("{} {} {} {}", self.year, self.make, self.model, trim)
            }
            _ => format!("{} {} {}", self.year, self.make, self.model),
        }
    }

    /// First listing image, used for thumbnails.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Catalog filter set. Every field is optional; `None` means "no constraint".
///
/// Also persisted by the client search and saved-search stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_mileage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Transmission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl VehicleFilters {
    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        *self == VehicleFilters::default()
    }

    /// Number of active filters (used for the "N filters" badge).
    pub fn active_count(&self) -> usize {
        [
            self.make.is_some(),
            self.model.is_some(),
            self.min_price.is_some(),
            self.max_price.is_some(),
            self.min_year.is_some(),
            self.max_year.is_some(),
            self.max_mileage.is_some(),
            self.fuel_type.is_some(),
            self.transmission.is_some(),
            self.body_type.is_some(),
            self.q.as_deref().map(|q| !q.trim().is_empty()).unwrap_or(false),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// Query parameters for `GET /api/vehicles`.
///
/// Kept flat (no `#[serde(flatten)]`) because URL-encoded numbers do not
/// survive flattening.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub max_mileage: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub body_type: Option<BodyType>,
    pub q: Option<String>,
    /// Defaults to `available` on the public catalog.
    pub status: Option<VehicleStatus>,
    pub featured: Option<bool>,
    #[serde(default)]
    pub sort: VehicleSort,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl VehicleListQuery {
    pub fn filters(&self) -> VehicleFilters {
        VehicleFilters {
            make: non_blank(&self.make),
            model: non_blank(&self.model),
            min_price: self.min_price,
            max_price: self.max_price,
            min_year: self.min_year,
            max_year: self.max_year,
            max_mileage: self.max_mileage,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            body_type: self.body_type,
            q: non_blank(&self.q),
        }
    }

    /// Stable cache key for this query (field order fixed, blanks dropped).
    pub fn cache_key(&self) -> String {
        let f = self.filters();
        format!(
            "vehicles:list:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}",
            f.make.as_deref().unwrap_or("").to_lowercase(),
            f.model.as_deref().unwrap_or("").to_lowercase(),
            opt(f.min_price),
            opt(f.max_price),
            opt(f.min_year),
            opt(f.max_year),
            opt(f.max_mileage),
            f.fuel_type.map(|v| v.as_str()).unwrap_or(""),
            f.transmission.map(|v| v.as_str()).unwrap_or(""),
            f.body_type.map(|v| v.as_str()).unwrap_or(""),
            f.q.as_deref().unwrap_or("").to_lowercase(),
            self.status.unwrap_or(VehicleStatus::Available).as_str(),
            opt(self.featured),
            self.sort.as_str(),
            opt(self.page),
            opt(self.limit),
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ============================================================================
// Requests
// ============================================================================

/// Request payload for adding a vehicle to inventory.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 32, message = "Stock number must be 1-32 characters"))]
    pub stock_number: String,

    #[validate(custom(function = "validate_vin"))]
    pub vin: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Make must be 1-50 characters"))]
    pub make: String,

    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: String,

    #[validate(length(max = 50, message = "Trim must be at most 50 characters"))]
    pub trim: Option<String>,

    #[validate(custom(function = "validate_model_year"))]
    pub year: i32,

    #[validate(custom(function = "validate_positive_price"))]
    pub price: i64,

    #[validate(range(min = 0, max = 2000000, message = "Mileage must be between 0 and 2,000,000"))]
    pub mileage: i32,

    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub body_type: BodyType,

    #[validate(length(max = 40, message = "Color must be at most 40 characters"))]
    pub exterior_color: Option<String>,

    #[validate(length(max = 40, message = "Color must be at most 40 characters"))]
    pub interior_color: Option<String>,

    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(
        length(max = 50, message = "At most 50 images per vehicle"),
        custom(function = "validate_image_urls")
    )]
    pub images: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "At most 100 features per vehicle"))]
    pub features: Vec<String>,

    #[serde(default = "default_status")]
    pub status: VehicleStatus,

    #[serde(default)]
    pub featured: bool,
}

fn default_status() -> VehicleStatus {
    VehicleStatus::Available
}

/// Request payload for editing a vehicle (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 50, message = "Make must be 1-50 characters"))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: Option<String>,

    #[validate(length(max = 50, message = "Trim must be at most 50 characters"))]
    pub trim: Option<String>,

    #[validate(custom(function = "validate_model_year"))]
    pub year: Option<i32>,

    #[validate(custom(function = "validate_positive_price"))]
    pub price: Option<i64>,

    #[validate(range(min = 0, max = 2000000, message = "Mileage must be between 0 and 2,000,000"))]
    pub mileage: Option<i32>,

    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub body_type: Option<BodyType>,

    #[validate(length(max = 40, message = "Color must be at most 40 characters"))]
    pub exterior_color: Option<String>,

    #[validate(length(max = 40, message = "Color must be at most 40 characters"))]
    pub interior_color: Option<String>,

    #[validate(length(max = 10000, message = "Description must be at most 10000 characters"))]
    pub description: Option<String>,

    #[validate(
        length(max = 50, message = "At most 50 images per vehicle"),
        custom(function = "validate_image_urls")
    )]
    pub images: Option<Vec<String>>,

    #[validate(length(max = 100, message = "At most 100 features per vehicle"))]
    pub features: Option<Vec<String>>,

    pub featured: Option<bool>,
}

/// Request payload for a status transition.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleStatusRequest {
    pub status: VehicleStatus,
}

// ============================================================================
// Responses
// ============================================================================

/// Make with the number of available vehicles, for filter dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MakeCount {
    pub make: String,
    pub count: i64,
}

/// Result of an admin status change, including any alert matches it triggered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatusChange {
    pub vehicle: Vehicle,
    pub previous_status: VehicleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts_notified: Option<usize>,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A baseline available sedan for matcher and pricing tests.
    pub fn sample_vehicle() -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            stock_number: "A1001".to_string(),
            vin: None,
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            trim: Some("SE".to_string()),
            year: 2021,
            price: 24_500,
            mileage: 31_000,
            fuel_type: FuelType::Gasoline,
            transmission: Transmission::Automatic,
            body_type: BodyType::Sedan,
            exterior_color: Some("Silver".to_string()),
            interior_color: None,
            description: None,
            images: vec!["https://cdn.example.com/a1001/1.jpg".to_string()],
            features: vec!["Backup Camera".to_string()],
            status: VehicleStatus::Available,
            featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
