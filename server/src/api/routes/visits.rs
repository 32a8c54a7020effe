//! Visit counter endpoints
//!
//! The two thin handlers over the counter service: record a visit, read a
//! count. Any counter failure surfaces as a generic server error; no
//! partial results.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::types::{ApiError, MAX_ID_LENGTH};
use crate::domain::visits::{ServedVia, VisitCounterService};

/// Shared state for visit endpoints
#[derive(Clone)]
pub struct VisitsApiState {
    pub counter: Arc<VisitCounterService>,
}

/// Build visit counter routes
pub fn routes(counter: Arc<VisitCounterService>) -> Router<()> {
    let state = VisitsApiState { counter };

    Router::new()
        .route("/visit/{page_id}", post(record_visit))
        .route("/visits/{page_id}", get(get_visits))
        .with_state(state)
}

/// Validate a page id path parameter
fn validate_page_id(page_id: &str) -> Result<(), ApiError> {
    if page_id.is_empty() || page_id.len() > MAX_ID_LENGTH {
        return Err(ApiError::bad_request(
            "INVALID_PAGE_ID",
            format!("page_id must be 1-{} characters", MAX_ID_LENGTH),
        ));
    }
    Ok(())
}

#[derive(Serialize, ToSchema)]
pub struct RecordVisitResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct VisitCountResponse {
    /// Current visit count (cached value plus buffered increments when
    /// served from memory)
    pub visits: i64,
    /// Which layer answered the read
    pub served_via: ServedVia,
}

/// Record a visit for a page
#[utoipa::path(
    post,
    path = "/api/v1/visit/{page_id}",
    tag = "visits",
    params(
        ("page_id" = String, Path, description = "Page identifier")
    ),
    responses(
        (status = 200, description = "Visit recorded", body = RecordVisitResponse),
        (status = 400, description = "Invalid page id")
    )
)]
pub async fn record_visit(
    State(state): State<VisitsApiState>,
    Path(page_id): Path<String>,
) -> Result<Json<RecordVisitResponse>, ApiError> {
    validate_page_id(&page_id)?;

    state.counter.record_visit(&page_id);

    Ok(Json(RecordVisitResponse {
        status: "success",
        message: format!("Visit recorded for page {}", page_id),
    }))
}

/// Get the visit count for a page
#[utoipa::path(
    get,
    path = "/api/v1/visits/{page_id}",
    tag = "visits",
    params(
        ("page_id" = String, Path, description = "Page identifier")
    ),
    responses(
        (status = 200, description = "Current visit count", body = VisitCountResponse),
        (status = 400, description = "Invalid page id"),
        (status = 500, description = "Counter store unavailable")
    )
)]
pub async fn get_visits(
    State(state): State<VisitsApiState>,
    Path(page_id): Path<String>,
) -> Result<Json<VisitCountResponse>, ApiError> {
    validate_page_id(&page_id)?;

    let count = state
        .counter
        .visit_count(&page_id)
        .await
        .map_err(ApiError::from_counter)?;

    Ok(Json(VisitCountResponse {
        visits: count.visits,
        served_via: count.served_via,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::config::{CounterConfig, StoreBackend, StoreConfig};
    use crate::data::store::CounterStore;

    async fn test_state() -> VisitsApiState {
        let store = Arc::new(
            CounterStore::new(&StoreConfig {
                backend: StoreBackend::Memory,
                redis_url: None,
            })
            .await
            .unwrap(),
        );
        let config = CounterConfig {
            cache_ttl_secs: 5,
            flush_interval_secs: 30,
        };
        VisitsApiState {
            counter: Arc::new(VisitCounterService::new(store, &config)),
        }
    }

    #[test]
    fn test_validate_page_id() {
        assert!(validate_page_id("p1").is_ok());
        assert!(validate_page_id(&"x".repeat(MAX_ID_LENGTH)).is_ok());
        assert!(validate_page_id("").is_err());
        assert!(validate_page_id(&"x".repeat(MAX_ID_LENGTH + 1)).is_err());
    }

    #[tokio::test]
    async fn test_record_then_read() {
        let state = test_state().await;

        for _ in 0..3 {
            let response = record_visit(State(state.clone()), Path("p1".to_string()))
                .await
                .unwrap();
            assert_eq!(response.status, "success");
            assert_eq!(response.message, "Visit recorded for page p1");
        }

        let response = get_visits(State(state.clone()), Path("p1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.visits, 3);
        assert_eq!(response.served_via, ServedVia::Redis);

        // Within the TTL the follow-up read is a cache hit
        let response = get_visits(State(state), Path("p1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.visits, 3);
        assert_eq!(response.served_via, ServedVia::InMemory);
    }

    #[tokio::test]
    async fn test_unknown_page_is_zero() {
        let state = test_state().await;
        let response = get_visits(State(state), Path("never-seen".to_string()))
            .await
            .unwrap();
        assert_eq!(response.visits, 0);
    }

    #[tokio::test]
    async fn test_invalid_page_id_rejected() {
        let state = test_state().await;
        let too_long = "x".repeat(MAX_ID_LENGTH + 1);
        assert!(
            record_visit(State(state.clone()), Path(too_long.clone()))
                .await
                .is_err()
        );
        assert!(get_visits(State(state), Path(too_long)).await.is_err());
    }

    #[tokio::test]
    async fn test_routes_end_to_end() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let state = test_state().await;
        let router = routes(state.counter.clone());

        for _ in 0..3 {
            let response = router
                .clone()
                .oneshot(
                    Request::post("/visit/p1")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = router
            .clone()
            .oneshot(Request::get("/visits/p1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["visits"], 3);
        assert_eq!(json["served_via"], "redis");
    }
}
