//! V1 API handlers.

mod products;
mod query;

#[cfg(test)]
mod products_test;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::db::DbError;

pub use products::*;
pub use query::{LISTING_FIELDS, ListProductsQuery};

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    #[schema(example = false)]
    pub success: bool,
    /// Error message
    #[schema(example = "Database error: database is locked")]
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Map a storage failure to a 500 response.
pub(crate) fn internal_error(e: DbError) -> (StatusCode, Json<ErrorResponse>) {
    error!(error = %e, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(e.to_string())),
    )
}
