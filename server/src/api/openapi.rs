//! OpenAPI specification

use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{health, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Footfall API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Visit counter service"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "visits", description = "Visit counting")
    ),
    paths(health::health, visits::record_visit, visits::get_visits)
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
