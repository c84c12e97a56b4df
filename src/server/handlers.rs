//! Route handlers

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::Instrument;
use uuid::Uuid;

use super::error::ApiError;
use super::request::InboundRequest;
use super::AppState;
use crate::orchestrator::AnalysisResponse;

/// Liveness check
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "Scam Honeypot API",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Analyze one inbound message and return the honeypot's reply
pub async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let request = InboundRequest::from_bytes(&body);
    let span = tracing::info_span!(
        "analyze",
        request_id = %Uuid::new_v4(),
        session_id = %request.session_id
    );
    span.in_scope(|| {
        tracing::debug!(payload = %String::from_utf8_lossy(&body), "Inbound analyze request")
    });

    let outcome = state
        .orchestrator
        .process(&request.session_id, &request.text, request.history)
        .instrument(span)
        .await?;

    Ok(Json(AnalysisResponse::from(&outcome)))
}

/// Return the stored messages of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = state
        .orchestrator
        .session(&session_id)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    Ok(Json(json!({
        "sessionId": session.id,
        "messages": session.messages,
    })))
}

/// Forget a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.orchestrator.clear_session(&session_id).await? {
        return Err(ApiError::SessionNotFound);
    }

    tracing::info!(session_id = %session_id, "Session cleared");
    Ok(Json(json!({
        "message": "Session cleared",
        "sessionId": session_id,
    })))
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::EndpointNotFound
}
