//! Admin dashboard notifications.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use domain::models::admin_notification::{
    ListNotificationsQuery, MarkAllReadResponse, UnreadCount,
};
use domain::models::{AdminNotification, ApiResponse, NewAdminNotification};
use persistence::repositories::AdminNotificationRepository;
use shared::pagination::PageMeta;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

/// GET /api/admin/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ApiResponse<Vec<AdminNotification>>>, ApiError> {
    let page = state.page(query.page, query.limit);
    let (rows, total) = AdminNotificationRepository::new(state.pool.clone())
        .list(query.unread, page)
        .await?;

    Ok(Json(ApiResponse::paginated(
        rows.into_iter().map(AdminNotification::from).collect(),
        PageMeta::new(page, total),
    )))
}

/// GET /api/admin/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UnreadCount>>, ApiError> {
    let unread = AdminNotificationRepository::new(state.pool.clone())
        .unread_count()
        .await?;
    Ok(Json(ApiResponse::ok(UnreadCount { unread })))
}

/// POST /api/admin/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NewAdminNotification>,
) -> Result<(StatusCode, Json<ApiResponse<AdminNotification>>), ApiError> {
    let notification = AdminNotification::from(
        AdminNotificationRepository::new(state.pool.clone())
            .create(&request)
            .await?,
    );

    info!(
        notification_id = %notification.id,
        kind = %notification.kind,
        "Admin notification created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(notification))))
}

/// PATCH /api/admin/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdminNotification>>, ApiError> {
    let notification = AdminNotificationRepository::new(state.pool.clone())
        .mark_read(id)
        .await?
        .map(AdminNotification::from)
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// POST /api/admin/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>, ApiError> {
    let updated = AdminNotificationRepository::new(state.pool.clone())
        .mark_all_read()
        .await?;

    info!(updated, "Marked all admin notifications read");
    Ok(Json(ApiResponse::ok(MarkAllReadResponse { updated })))
}

/// DELETE /api/admin/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !AdminNotificationRepository::new(state.pool.clone())
        .delete(id)
        .await?
    {
        return Err(ApiError::NotFound("Notification not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
