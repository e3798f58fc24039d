//! System health and status handlers.

use axum::{Json, http::StatusCode, response::Html};
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::api::v1::ErrorResponse;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "ok")]
    pub status: String,
}

/// Landing page
#[instrument]
pub async fn root() -> Html<&'static str> {
    Html(
        "<h1>Product catalog</h1><p><a href=\"/api/v1/products\">Products route</a> | <a href=\"/docs\">API docs</a></p>",
    )
}

/// Health check endpoint
///
/// Returns the current health status of the API
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Fallback for unmatched routes
pub async fn not_found(uri: axum::http::Uri) -> (StatusCode, Json<ErrorResponse>) {
    debug!(%uri, "no route matched");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route does not exist")),
    )
}
