//! Vehicle catalog endpoint handlers.
//!
//! Public reads go through the cache under the `vehicles:` prefix; every
//! admin mutation invalidates that prefix.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

use domain::models::vehicle::{
    CreateVehicleRequest, MakeCount, UpdateVehicleRequest, UpdateVehicleStatusRequest,
    VehicleListQuery, VehicleStatusChange,
};
use domain::models::{ApiResponse, Vehicle, VehicleStatus};
use domain::services::similar_price_range;
use persistence::repositories::{VehicleListParams, VehicleRepository};
use shared::pagination::PageMeta;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::routes::{cache_keys, CachedPage};

fn check_ranges(query: &VehicleListQuery) -> Result<(), ApiError> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(ApiError::field(
                "minPrice",
                "minPrice cannot be greater than maxPrice",
            ));
        }
    }
    if let (Some(min), Some(max)) = (query.min_year, query.max_year) {
        if min > max {
            return Err(ApiError::field(
                "minYear",
                "minYear cannot be greater than maxYear",
            ));
        }
    }
    Ok(())
}

/// Runs the alert matcher; failures are logged, the mutation already happened.
async fn match_alerts(state: &AppState, vehicle: &Vehicle) -> Option<usize> {
    match state.alert_matcher.run(vehicle).await {
        Ok(outcome) => Some(outcome.notifications_created),
        Err(e) => {
            warn!(vehicle_id = %vehicle.id, error = %e, "Inventory alert matching failed");
            None
        }
    }
}

async fn load_vehicle(state: &AppState, id: Uuid) -> Result<Vehicle, ApiError> {
    VehicleRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .map(Vehicle::from)
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))
}

/// GET /api/vehicles
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(query): Query<VehicleListQuery>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, ApiError> {
    check_ranges(&query)?;

    let key = query.cache_key();
    let params = VehicleListParams {
        filters: query.filters(),
        status: query.status.unwrap_or(VehicleStatus::Available),
        featured: query.featured,
        sort: query.sort,
        page: state.page(query.page, query.limit),
    };

    let pool = state.pool.clone();
    let page: CachedPage<Vehicle> = state
        .cache
        .get_stale_while_revalidate(&key, state.cache_ttl(), move || async move {
            let (rows, total) = VehicleRepository::new(pool).list(&params).await?;
            Ok::<_, ApiError>(CachedPage {
                items: rows.into_iter().map(Vehicle::from).collect(),
                meta: PageMeta::new(params.page, total),
            })
        })
        .await?;

    Ok(Json(ApiResponse::paginated(page.items, page.meta)))
}

/// GET /api/vehicles/featured
pub async fn featured_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, ApiError> {
    let limit = state.config.limits.featured_vehicle_count;
    let key = format!("{}featured:{}", cache_keys::VEHICLES, limit);
    let pool = state.pool.clone();

    let vehicles: Vec<Vehicle> = state
        .cache
        .get_stale_while_revalidate(&key, state.cache_ttl(), move || async move {
            let rows = VehicleRepository::new(pool).featured(limit).await?;
            Ok::<_, ApiError>(rows.into_iter().map(Vehicle::from).collect())
        })
        .await?;

    Ok(Json(ApiResponse::ok(vehicles)))
}

/// GET /api/vehicles/makes
pub async fn list_makes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MakeCount>>>, ApiError> {
    let key = format!("{}makes", cache_keys::VEHICLES);
    let pool = state.pool.clone();

    let makes: Vec<MakeCount> = state
        .cache
        .get_stale_while_revalidate(&key, state.cache_ttl(), move || async move {
            let rows = VehicleRepository::new(pool).makes().await?;
            Ok::<_, ApiError>(rows.into_iter().map(MakeCount::from).collect())
        })
        .await?;

    Ok(Json(ApiResponse::ok(makes)))
}

/// GET /api/vehicles/:id
///
/// Sold and reserved vehicles are still served so shared links keep working.
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, ApiError> {
    let key = format!("{}detail:{}", cache_keys::VEHICLES, id);
    let vehicle = state
        .cache
        .get_or_set(&key, state.cache_ttl(), || load_vehicle(&state, id))
        .await?;

    Ok(Json(ApiResponse::ok(vehicle)))
}

/// GET /api/vehicles/:id/similar
pub async fn similar_vehicles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, ApiError> {
    let key = format!("{}similar:{}", cache_keys::VEHICLES, id);
    let limit = state.config.limits.similar_vehicle_count;

    let vehicles: Vec<Vehicle> = state
        .cache
        .get_or_set(&key, state.cache_ttl(), || async {
            let vehicle = load_vehicle(&state, id).await?;
            let (min_price, max_price) = similar_price_range(vehicle.price);
            let rows = VehicleRepository::new(state.pool.clone())
                .similar(&vehicle, min_price, max_price, limit)
                .await?;
            Ok::<_, ApiError>(rows.into_iter().map(Vehicle::from).collect())
        })
        .await?;

    Ok(Json(ApiResponse::ok(vehicles)))
}

/// POST /api/admin/vehicles
pub async fn create_vehicle(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), ApiError> {
    let vehicle = Vehicle::from(
        VehicleRepository::new(state.pool.clone())
            .create(&request)
            .await?,
    );
    state.cache.invalidate_prefix(cache_keys::VEHICLES).await;

    info!(
        vehicle_id = %vehicle.id,
        stock_number = %vehicle.stock_number,
        status = %vehicle.status,
        "Vehicle created"
    );

    if vehicle.is_available() {
        match_alerts(&state, &vehicle).await;
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(vehicle))))
}

/// PATCH /api/admin/vehicles/:id
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, ApiError> {
    let vehicle = VehicleRepository::new(state.pool.clone())
        .update(id, &request)
        .await?
        .map(Vehicle::from)
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;
    state.cache.invalidate_prefix(cache_keys::VEHICLES).await;

    info!(vehicle_id = %vehicle.id, "Vehicle updated");

    Ok(Json(ApiResponse::ok(vehicle)))
}

async fn change_status(
    state: &AppState,
    id: Uuid,
    status: VehicleStatus,
) -> Result<VehicleStatusChange, ApiError> {
    let (entity, previous) = VehicleRepository::new(state.pool.clone())
        .update_status(id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;
    state.cache.invalidate_prefix(cache_keys::VEHICLES).await;

    // Unrecognised stored values count as off the lot.
    let previous_status = VehicleStatus::from_str(&previous).unwrap_or(VehicleStatus::Sold);
    let vehicle = Vehicle::from(entity);

    info!(
        vehicle_id = %vehicle.id,
        from = %previous_status,
        to = %vehicle.status,
        "Vehicle status changed"
    );

    let alerts_notified = if previous_status.becomes_available(vehicle.status) {
        match_alerts(state, &vehicle).await
    } else {
        None
    };

    Ok(VehicleStatusChange {
        vehicle,
        previous_status,
        alerts_notified,
    })
}

/// PATCH /api/admin/vehicles/:id/status
pub async fn update_vehicle_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleStatusRequest>,
) -> Result<Json<ApiResponse<VehicleStatusChange>>, ApiError> {
    let change = change_status(&state, id, request.status).await?;
    Ok(Json(ApiResponse::ok(change)))
}

/// DELETE /api/admin/vehicles/:id
///
/// Vehicles are never removed; this marks the vehicle sold.
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleStatusChange>>, ApiError> {
    let change = change_status(&state, id, VehicleStatus::Sold).await?;
    Ok(Json(
        ApiResponse::ok(change).with_message("Vehicle marked as sold"),
    ))
}
