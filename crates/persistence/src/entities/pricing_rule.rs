//! Pricing rule entity (database row mapping).
//!
//! Conditions are stored as nullable `cond_*` columns.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::pricing_rule::{AdjustmentKind, PricingConditions};

pub const PRICING_RULE_COLUMNS: &str = "id, name, description, adjustment_kind, adjustment_value, \
     cond_make, cond_body_type, cond_min_year, cond_max_year, cond_min_price, cond_max_price, \
     priority, is_active, created_at, updated_at";

/// Database row mapping for the pricing_rules table.
#[derive(Debug, Clone, FromRow)]
pub struct PricingRuleEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub adjustment_kind: String,
    pub adjustment_value: f64,
    pub cond_make: Option<String>,
    pub cond_body_type: Option<String>,
    pub cond_min_year: Option<i32>,
    pub cond_max_year: Option<i32>,
    pub cond_min_price: Option<i64>,
    pub cond_max_price: Option<i64>,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRuleEntity {
    pub fn into_domain(self) -> domain::models::PricingRule {
        // An unknown kind disables the rule instead of applying a guess.
        let kind = self.adjustment_kind.parse::<AdjustmentKind>();
        let is_active = self.is_active && kind.is_ok();
        domain::models::PricingRule {
            id: self.id,
            name: self.name,
            description: self.description,
            adjustment_kind: kind.unwrap_or(AdjustmentKind::Fixed),
            adjustment_value: self.adjustment_value,
            conditions: PricingConditions {
                make: self.cond_make,
                body_type: self.cond_body_type.and_then(|b| b.parse().ok()),
                min_year: self.cond_min_year,
                max_year: self.cond_max_year,
                min_price: self.cond_min_price,
                max_price: self.cond_max_price,
            },
            priority: self.priority,
            is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<PricingRuleEntity> for domain::models::PricingRule {
    fn from(entity: PricingRuleEntity) -> Self {
        entity.into_domain()
    }
}
