//! Inventory alert subscriptions and the admin match trigger.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::ValidateEmail;

use domain::models::inventory_alert::{
    CreateAlertResponse, CreateInventoryAlertRequest, ListAlertsQuery,
};
use domain::models::{AlertMatchOutcome, ApiResponse, InventoryAlert, Vehicle};
use persistence::repositories::{InventoryAlertRepository, VehicleRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::metrics::record_lead_created;

/// POST /api/inventory-alerts
///
/// Reports how many vehicles already on the lot match the new alert.
pub async fn create_alert(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateInventoryAlertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateAlertResponse>>), ApiError> {
    let repo = InventoryAlertRepository::new(state.pool.clone());
    let alert = InventoryAlert::from(repo.create(&request).await?);
    let current_matches = repo.count_available_matches(&alert.criteria).await?;

    info!(
        alert_id = %alert.id,
        criteria = %alert.criteria.describe(),
        current_matches,
        "Inventory alert created"
    );
    record_lead_created("alert");

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(CreateAlertResponse {
                alert,
                current_matches,
            })
            .with_message("We'll let you know when a matching vehicle arrives."),
        ),
    ))
}

/// GET /api/inventory-alerts?email=
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<ListAlertsQuery>,
) -> Result<Json<ApiResponse<Vec<InventoryAlert>>>, ApiError> {
    let email = query.email.trim();
    if !email.validate_email() {
        return Err(ApiError::field("email", "Please enter a valid email address"));
    }

    let alerts = InventoryAlertRepository::new(state.pool.clone())
        .list_by_email(email, query.include_inactive)
        .await?
        .into_iter()
        .map(InventoryAlert::from)
        .collect();

    Ok(Json(ApiResponse::ok(alerts)))
}

/// DELETE /api/inventory-alerts/:id
///
/// Unsubscribe. The alert is kept, inactive, so match history survives.
pub async fn deactivate_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !InventoryAlertRepository::new(state.pool.clone())
        .deactivate(id)
        .await?
    {
        return Err(ApiError::NotFound("Alert not found".to_string()));
    }

    info!(alert_id = %id, "Inventory alert deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/inventory-alerts/match/:vehicle_id
pub async fn run_match(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AlertMatchOutcome>>, ApiError> {
    let vehicle = VehicleRepository::new(state.pool.clone())
        .find_by_id(vehicle_id)
        .await?
        .map(Vehicle::from)
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    let outcome = state.alert_matcher.run(&vehicle).await?;

    info!(
        vehicle_id = %vehicle.id,
        matched = outcome.matched_alerts,
        notified = outcome.notifications_created,
        "Manual alert match run"
    );
    Ok(Json(ApiResponse::ok(outcome)))
}
