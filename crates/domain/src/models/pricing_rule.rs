//! Pricing rule model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use shared::validation::MAX_VEHICLE_PRICE;

use super::vehicle::{BodyType, Vehicle};

text_enum! {
    /// How a rule's value is applied to the running price.
    AdjustmentKind {
        /// `value` is a percentage: -5 means 5% off.
        Percentage => "percentage",
        /// `value` is added in whole currency units (negative for a discount).
        Fixed => "fixed",
    }
}

/// Optional conditions a vehicle must meet for a rule to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_condition_ranges"))]
pub struct PricingConditions {
    pub make: Option<String>,
    pub body_type: Option<BodyType>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl PricingConditions {
    /// `price` is the list price, not the running adjusted price.
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.make
            .as_deref()
            .map_or(true, |m| m.trim().eq_ignore_ascii_case(vehicle.make.trim()))
            && self.body_type.map_or(true, |b| b == vehicle.body_type)
            && self.min_year.map_or(true, |y| vehicle.year >= y)
            && self.max_year.map_or(true, |y| vehicle.year <= y)
            && self.min_price.map_or(true, |p| vehicle.price >= p)
            && self.max_price.map_or(true, |p| vehicle.price <= p)
    }
}

fn validate_condition_ranges(c: &PricingConditions) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (c.min_year, c.max_year) {
        if min > max {
            let mut err = ValidationError::new("year_range");
            err.message = Some("minYear must not exceed maxYear".into());
            return Err(err);
        }
    }
    if let (Some(min), Some(max)) = (c.min_price, c.max_price) {
        if min > max {
            let mut err = ValidationError::new("price_range");
            err.message = Some("minPrice must not exceed maxPrice".into());
            return Err(err);
        }
    }
    Ok(())
}

/// A stored pricing rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub adjustment_kind: AdjustmentKind,
    pub adjustment_value: f64,
    pub conditions: PricingConditions,
    /// Lower runs first.
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    pub fn applies_to(&self, vehicle: &Vehicle) -> bool {
        self.is_active && self.conditions.matches(vehicle)
    }

    /// Applies this rule to a running price. Never returns a negative price.
    pub fn apply(&self, price: i64) -> i64 {
        let adjusted = match self.adjustment_kind {
            AdjustmentKind::Percentage => {
                (price as f64 * (1.0 + self.adjustment_value / 100.0)).round() as i64
            }
            AdjustmentKind::Fixed => price.saturating_add(self.adjustment_value.round() as i64),
        };
        adjusted.max(0)
    }
}

fn validate_adjustment(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value != 0.0 && value.abs() <= MAX_VEHICLE_PRICE as f64 {
        Ok(())
    } else {
        let mut err = ValidationError::new("adjustment_value");
        err.message = Some(
            format!(
                "Adjustment must be a non-zero number between -{0} and {0}",
                MAX_VEHICLE_PRICE
            )
            .into(),
        );
        Err(err)
    }
}

/// Request payload for creating a pricing rule.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePricingRuleRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub adjustment_kind: AdjustmentKind,

    #[validate(custom(function = "validate_adjustment"))]
    pub adjustment_value: f64,

    #[serde(default)]
    #[validate(nested)]
    pub conditions: PricingConditions,

    #[serde(default)]
    #[validate(range(min = 0, max = 10000, message = "Priority must be between 0 and 10000"))]
    pub priority: i32,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CreatePricingRuleRequest {
    /// Percentage rules cannot take more than the whole price.
    pub fn check_percentage_floor(&self) -> Result<(), String> {
        check_percentage_floor(self.adjustment_kind, self.adjustment_value)
    }
}

/// Request payload for editing a pricing rule (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricingRuleRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub adjustment_kind: Option<AdjustmentKind>,

    #[validate(custom(function = "validate_adjustment"))]
    pub adjustment_value: Option<f64>,

    #[validate(nested)]
    pub conditions: Option<PricingConditions>,

    #[validate(range(min = 0, max = 10000, message = "Priority must be between 0 and 10000"))]
    pub priority: Option<i32>,

    pub is_active: Option<bool>,
}

/// Rejects percentage rules at or below -100%.
pub fn check_percentage_floor(kind: AdjustmentKind, value: f64) -> Result<(), String> {
    if kind == AdjustmentKind::Percentage && value <= -100.0 {
        return Err("Percentage discount must be greater than -100".to_string());
    }
    Ok(())
}
