//! Admin authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_key::{AdminKey, API_KEY_HEADER};
use crate::middleware::trace_id::get_request_id;

/// Requires a valid admin key in `X-API-Key`.
///
/// The authenticated key is stored in request extensions for handlers.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let Some(api_key) = api_key else {
        tracing::debug!(
            request_id = %get_request_id(req.extensions()),
            path = %req.uri().path(),
            "Admin request without API key"
        );
        return ApiError::Unauthorized("Invalid or missing API key".to_string()).into_response();
    };

    match AdminKey::validate(&state.pool, &api_key).await {
        Ok(auth) => {
            tracing::debug!(key_prefix = %auth.key_prefix, "Admin request authenticated");
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => {
            tracing::warn!(
                request_id = %get_request_id(req.extensions()),
                path = %req.uri().path(),
                "Admin authentication failed"
            );
            err.into_response()
        }
    }
}
