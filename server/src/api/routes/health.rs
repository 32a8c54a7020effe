//! Health check endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::ApiError;
use crate::data::store::CounterStore;

/// Shared state for the health endpoint
#[derive(Clone)]
pub struct HealthApiState {
    pub store: Arc<CounterStore>,
}

/// Build health routes
pub fn routes(store: Arc<CounterStore>) -> Router<()> {
    Router::new()
        .route("/health", get(health))
        .with_state(HealthApiState { store })
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
}

/// Health check endpoint
///
/// Verifies the counter store connection; a healthy process with an
/// unreachable store is not healthy.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Counter store unreachable")
    )
)]
pub async fn health(
    State(state): State<HealthApiState>,
) -> Result<Json<HealthResponse>, ApiError> {
    state.store.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::service_unavailable("Counter store unreachable")
    })?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend_name(),
    }))
}
