//! Inventory alert domain model.
//!
//! An alert is a saved set of criteria; when a matching vehicle becomes
//! available the customer is notified. Every criterion is optional and a
//! missing criterion places no constraint on the match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::vehicle::{BodyType, FuelType, Vehicle};

/// Optional matching criteria shared by alerts and the client alert store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCriteria {
    pub make: Option<String>,
    pub model: Option<String>,
    pub max_price: Option<i64>,
    pub min_year: Option<i32>,
    pub max_mileage: Option<i32>,
    pub body_type: Option<BodyType>,
    pub fuel_type: Option<FuelType>,
}

impl AlertCriteria {
    /// True when no criterion is set (matches every available vehicle).
    pub fn is_empty(&self) -> bool {
        *self == AlertCriteria::default()
    }

    /// Evaluates the criteria against a vehicle.
    ///
    /// Mirrors the SQL predicate used by the alert repository: make and model
    /// compare case-insensitively, bounds are inclusive, `None` is no constraint.
    /// Vehicle status is not considered here.
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        let text_eq = |want: &Option<String>, have: &str| {
            want.as_deref()
                .map(|w| w.trim().to_lowercase() == have.trim().to_lowercase())
                .unwrap_or(true)
        };

        text_eq(&self.make, &vehicle.make)
            && text_eq(&self.model, &vehicle.model)
            && self.max_price.map_or(true, |max| vehicle.price <= max)
            && self.min_year.map_or(true, |min| vehicle.year >= min)
            && self.max_mileage.map_or(true, |max| vehicle.mileage <= max)
            && self.body_type.map_or(true, |b| vehicle.body_type == b)
            && self.fuel_type.map_or(true, |f| vehicle.fuel_type == f)
    }

    /// Short human-readable summary, e.g. "Toyota RAV4 under $30000, 2019+".
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let name = [self.make.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            parts.push(name);
        }
        if let Some(body) = self.body_type {
            parts.push(body.to_string());
        }
        if let Some(fuel) = self.fuel_type {
            parts.push(fuel.to_string());
        }
        if let Some(max) = self.max_price {
            parts.push(format!("under ${}", max));
        }
        if let Some(min) = self.min_year {
            parts.push(format!("{}+", min));
        }
        if let Some(max) = self.max_mileage {
            parts.push(format!("under {} miles", max));
        }
        if parts.is_empty() {
            "any vehicle".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// A customer's inventory alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlert {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(flatten)]
    pub criteria: AlertCriteria,
    pub is_active: bool,
    pub last_notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryAlert {
    /// Full match check: active alert, available vehicle, criteria hold.
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.is_active && vehicle.is_available() && self.criteria.matches(vehicle)
    }
}

/// Request payload for creating an inventory alert.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryAlertRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Make must be 1-50 characters"))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: Option<String>,

    #[validate(custom(function = "shared::validation::validate_positive_price"))]
    pub max_price: Option<i64>,

    #[validate(custom(function = "shared::validation::validate_model_year"))]
    pub min_year: Option<i32>,

    #[validate(range(min = 0, message = "Mileage must not be negative"))]
    pub max_mileage: Option<i32>,

    pub body_type: Option<BodyType>,
    pub fuel_type: Option<FuelType>,
}

impl CreateInventoryAlertRequest {
    pub fn criteria(&self) -> AlertCriteria {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        AlertCriteria {
            make: clean(&self.make),
            model: clean(&self.model),
            max_price: self.max_price,
            min_year: self.min_year,
            max_mileage: self.max_mileage,
            body_type: self.body_type,
            fuel_type: self.fuel_type,
        }
    }
}

/// Query parameters for listing a customer's alerts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlertsQuery {
    pub email: String,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Response after creating an alert.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertResponse {
    pub alert: InventoryAlert,
    /// Number of vehicles already in stock that match the new alert.
    pub current_matches: i64,
}

/// Outcome of running the matcher for one vehicle.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertMatchOutcome {
    pub vehicle_id: Uuid,
    /// Active alerts whose criteria matched.
    pub matched_alerts: usize,
    /// New notification rows written (already-notified pairs are skipped).
    pub notifications_created: usize,
}
