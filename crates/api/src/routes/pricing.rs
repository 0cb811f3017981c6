//! Pricing rule administration and price previews.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use domain::models::pricing_rule::{
    check_percentage_floor, CreatePricingRuleRequest, UpdatePricingRuleRequest,
};
use domain::models::{ApiResponse, PricingRule, Vehicle};
use domain::services::{apply_pricing_rules, PricePreview};
use persistence::repositories::{PricingRuleRepository, VehicleRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRulesQuery {
    #[serde(default)]
    pub active_only: bool,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Pricing rule not found".to_string())
}

/// GET /api/admin/pricing-rules
///
/// Rules come back in evaluation order.
pub async fn list_rules(
    State(state): State<AppState>,
    Query(query): Query<ListRulesQuery>,
) -> Result<Json<ApiResponse<Vec<PricingRule>>>, ApiError> {
    let rules = PricingRuleRepository::new(state.pool.clone())
        .list(query.active_only)
        .await?
        .into_iter()
        .map(PricingRule::from)
        .collect();
    Ok(Json(ApiResponse::ok(rules)))
}

/// GET /api/admin/pricing-rules/:id
pub async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PricingRule>>, ApiError> {
    let rule = PricingRuleRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .map(PricingRule::from)
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::ok(rule)))
}

/// POST /api/admin/pricing-rules
pub async fn create_rule(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePricingRuleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PricingRule>>), ApiError> {
    request
        .check_percentage_floor()
        .map_err(|msg| ApiError::field("adjustmentValue", msg))?;

    let rule = PricingRule::from(
        PricingRuleRepository::new(state.pool.clone())
            .create(&request)
            .await?,
    );

    info!(
        rule_id = %rule.id,
        name = %rule.name,
        kind = %rule.adjustment_kind,
        value = rule.adjustment_value,
        priority = rule.priority,
        "Pricing rule created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(rule))))
}

/// PATCH /api/admin/pricing-rules/:id
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdatePricingRuleRequest>,
) -> Result<Json<ApiResponse<PricingRule>>, ApiError> {
    let repo = PricingRuleRepository::new(state.pool.clone());

    if request.adjustment_kind.is_some() || request.adjustment_value.is_some() {
        let current = repo
            .find_by_id(id)
            .await?
            .map(PricingRule::from)
            .ok_or_else(not_found)?;
        check_percentage_floor(
            request.adjustment_kind.unwrap_or(current.adjustment_kind),
            request.adjustment_value.unwrap_or(current.adjustment_value),
        )
        .map_err(|msg| ApiError::field("adjustmentValue", msg))?;
    }

    let rule = repo
        .update(id, &request)
        .await?
        .map(PricingRule::from)
        .ok_or_else(not_found)?;

    info!(rule_id = %rule.id, is_active = rule.is_active, "Pricing rule updated");
    Ok(Json(ApiResponse::ok(rule)))
}

/// DELETE /api/admin/pricing-rules/:id
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !PricingRuleRepository::new(state.pool.clone())
        .delete(id)
        .await?
    {
        return Err(not_found());
    }

    info!(rule_id = %id, "Pricing rule deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/pricing-rules/preview/:vehicle_id
pub async fn preview(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PricePreview>>, ApiError> {
    let vehicle = VehicleRepository::new(state.pool.clone())
        .find_by_id(vehicle_id)
        .await?
        .map(Vehicle::from)
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let rules: Vec<PricingRule> = PricingRuleRepository::new(state.pool.clone())
        .list(true)
        .await?
        .into_iter()
        .map(PricingRule::from)
        .collect();

    let preview = apply_pricing_rules(&vehicle, &rules);
    tracing::debug!(
        vehicle_id = %vehicle.id,
        original = preview.original_price,
        adjusted = preview.adjusted_price,
        applied = preview.applied.len(),
        "Pricing preview"
    );
    Ok(Json(ApiResponse::ok(preview)))
}
