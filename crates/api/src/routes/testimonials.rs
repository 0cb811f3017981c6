//! Customer testimonials: public listing, submission and moderation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::testimonial::{
    CreateTestimonialRequest, ListTestimonialsQuery, ModerateTestimonialRequest, RatingSummary,
};
use domain::models::{ApiResponse, Testimonial};
use persistence::repositories::TestimonialRepository;
use shared::pagination::PageMeta;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::metrics::record_lead_created;
use crate::routes::cache_keys;

/// GET /api/testimonials
pub async fn list_public(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Testimonial>>>, ApiError> {
    let limit = state.config.limits.public_testimonial_count;
    let key = format!("{}public:{}", cache_keys::TESTIMONIALS, limit);
    let pool = state.pool.clone();

    let testimonials: Vec<Testimonial> = state
        .cache
        .get_stale_while_revalidate(&key, state.cache_ttl(), move || async move {
            let rows = TestimonialRepository::new(pool).list_visible(limit).await?;
            Ok::<_, ApiError>(rows.into_iter().map(Testimonial::from).collect())
        })
        .await?;

    Ok(Json(ApiResponse::ok(testimonials)))
}

/// GET /api/testimonials/summary
pub async fn rating_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RatingSummary>>, ApiError> {
    let key = format!("{}summary", cache_keys::TESTIMONIALS);
    let summary = state
        .cache
        .get_or_set(&key, state.cache_ttl(), || async {
            let row = TestimonialRepository::new(state.pool.clone())
                .rating_summary()
                .await?;
            Ok::<_, ApiError>(RatingSummary::from(row))
        })
        .await?;

    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/testimonials
///
/// Submissions wait for moderation and are not visible until approved.
pub async fn submit(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTestimonialRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Testimonial>>), ApiError> {
    let testimonial = Testimonial::from(
        TestimonialRepository::new(state.pool.clone())
            .create(&request)
            .await?,
    );

    info!(
        testimonial_id = %testimonial.id,
        rating = testimonial.rating,
        "Testimonial submitted"
    );
    record_lead_created("testimonial");
    state.leads.new_testimonial(&testimonial).await;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(testimonial)
                .with_message("Thank you! Your review will appear once it has been approved."),
        ),
    ))
}

/// GET /api/admin/testimonials
pub async fn list_for_admin(
    State(state): State<AppState>,
    Query(query): Query<ListTestimonialsQuery>,
) -> Result<Json<ApiResponse<Vec<Testimonial>>>, ApiError> {
    let page = state.page(query.page, query.limit);
    let (rows, total) = TestimonialRepository::new(state.pool.clone())
        .list_for_admin(query.status, page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        rows.into_iter().map(Testimonial::from).collect(),
        PageMeta::new(page, total),
    )))
}

/// PATCH /api/admin/testimonials/:id
pub async fn moderate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ModerateTestimonialRequest>,
) -> Result<Json<ApiResponse<Testimonial>>, ApiError> {
    if request.is_approved.is_none() && request.is_public.is_none() {
        return Err(ApiError::Validation(
            "Provide isApproved and/or isPublic".to_string(),
        ));
    }

    let testimonial = TestimonialRepository::new(state.pool.clone())
        .moderate(id, &request)
        .await?
        .map(Testimonial::from)
        .ok_or_else(|| ApiError::NotFound("Testimonial not found".to_string()))?;
    state.cache.invalidate_prefix(cache_keys::TESTIMONIALS).await;

    info!(
        testimonial_id = %testimonial.id,
        is_approved = testimonial.is_approved,
        is_public = testimonial.is_public,
        "Testimonial moderated"
    );
    Ok(Json(ApiResponse::ok(testimonial)))
}

/// DELETE /api/admin/testimonials/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = TestimonialRepository::new(state.pool.clone())
        .delete(id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Testimonial not found".to_string()));
    }
    state.cache.invalidate_prefix(cache_keys::TESTIMONIALS).await;

    info!(testimonial_id = %id, "Testimonial deleted");
    Ok(StatusCode::NO_CONTENT)
}
