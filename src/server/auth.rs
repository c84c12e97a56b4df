//! API-key gate for `/api` routes

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::AppState;

/// Header carrying the shared API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests whose `x-api-key` header does not match the configured key
pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let supplied = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if supplied == Some(state.api_key.as_ref()) {
        return next.run(req).await;
    }

    tracing::warn!(
        path = %req.uri().path(),
        key_present = supplied.is_some(),
        "Rejected request with invalid API key"
    );
    ApiError::Unauthorized.into_response()
}
