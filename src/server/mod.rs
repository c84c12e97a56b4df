//! HTTP transport
//!
//! A thin axum layer over the [`Orchestrator`]: routing, the API-key gate,
//! tolerant request decoding and JSON error mapping. CORS is left to a
//! fronting proxy.
//!
//! Routes:
//! - `GET /health` (open)
//! - `POST /api/analyze`
//! - `GET /api/sessions/:id`
//! - `DELETE /api/sessions/:id`

pub mod auth;
pub mod error;
pub mod handlers;
pub mod request;

pub use error::ApiError;

use std::sync::Arc;

use anyhow::Context;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::Orchestrator;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, api_key: &str) -> Self {
        Self {
            orchestrator,
            api_key: Arc::from(api_key),
        }
    }
}

/// Build the service router.
///
/// Only routes under `/api` require the API key; unknown paths get a JSON
/// 404 regardless of authentication.
pub fn build_router(state: AppState) -> Router {
    // NOTE: Path params use `:param` syntax (axum 0.7).
    let api = Router::new()
        .route("/analyze", post(handlers::analyze))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C
///
/// # Errors
///
/// Returns error if the address cannot be bound or the server fails
pub async fn serve(config: &Config, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(addr = %addr, "Scam honeypot API listening");

    let app = build_router(AppState::new(orchestrator, &config.auth.api_key));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
