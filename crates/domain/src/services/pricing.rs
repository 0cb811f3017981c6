//! Pricing rule evaluation.
//!
//! Rules are applied in ascending priority to a running price, each rule
//! seeing the output of the previous one. Conditions are always evaluated
//! against the vehicle's list price.

use serde::Serialize;
use uuid::Uuid;

use crate::models::pricing_rule::{AdjustmentKind, PricingRule};
use crate::models::vehicle::Vehicle;

/// One rule that changed the price during a preview.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedRule {
    pub rule_id: Uuid,
    pub name: String,
    pub adjustment_kind: AdjustmentKind,
    pub adjustment_value: f64,
    pub price_before: i64,
    pub price_after: i64,
}

/// Result of previewing pricing rules against a vehicle.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricePreview {
    pub vehicle_id: Uuid,
    pub original_price: i64,
    pub adjusted_price: i64,
    pub applied: Vec<AppliedRule>,
}

impl PricePreview {
    /// Adjusted minus original; negative for a net discount.
    pub fn difference(&self) -> i64 {
        self.adjusted_price - self.original_price
    }
}

/// Applies every active matching rule to the vehicle's price.
///
/// Ties in priority keep the input order, so callers should pass rules
/// ordered by creation time.
pub fn apply_pricing_rules(vehicle: &Vehicle, rules: &[PricingRule]) -> PricePreview {
    let mut ordered: Vec<&PricingRule> = rules.iter().filter(|r| r.applies_to(vehicle)).collect();
    ordered.sort_by_key(|r| r.priority);

    let mut price = vehicle.price;
    let mut applied = Vec::with_capacity(ordered.len());

    for rule in ordered {
        let before = price;
        price = rule.apply(price);
        tracing::trace!(rule = %rule.name, before, after = price, "Applied pricing rule");
        applied.push(AppliedRule {
            rule_id: rule.id,
            name: rule.name.clone(),
            adjustment_kind: rule.adjustment_kind,
            adjustment_value: rule.adjustment_value,
            price_before: before,
            price_after: price,
        });
    }

    PricePreview {
        vehicle_id: vehicle.id,
        original_price: vehicle.price,
        adjusted_price: price.max(0),
        applied,
    }
}
