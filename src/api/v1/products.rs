//! Product catalog handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::{ErrorResponse, ListProductsQuery, internal_error};
use crate::api::AppState;
use crate::db::{Database, ProductDocument, ProductQuery, ProductRepository};

// =============================================================================
// DTOs
// =============================================================================

/// Envelope wrapping every product listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsEnvelope {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Products fetched")]
    pub message: String,
    /// Number of products in `data`
    #[serde(rename = "numOfHits")]
    #[schema(example = 1)]
    pub num_of_hits: usize,
    /// Products reduced to the selected fields
    #[schema(value_type = Vec<Object>, example = json!([{"name": "bar stool", "price": 40, "rating": 4.5}]))]
    pub data: Vec<ProductDocument>,
}

impl ProductsEnvelope {
    fn new(message: &str, data: Vec<ProductDocument>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            num_of_hits: data.len(),
            data,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List products
///
/// Filters, sorts and paginates the catalog. Every product is returned with
/// at least name, price and rating; the identifier is never included.
/// A repeated parameter keeps its first value.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Matching products", body = ProductsEnvelope),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_products<D: Database>(
    State(state): State<AppState<D>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ProductsEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    let query = ListProductsQuery::from_pairs(pairs);
    let product_query = query.to_product_query(state.max_limit());
    debug!(?product_query, "translated listing query");

    let data = state
        .db()
        .products()
        .find(&product_query)
        .await
        .map_err(internal_error)?;

    Ok(Json(ProductsEnvelope::new("Products fetched", data)))
}

/// List products (static testing route)
///
/// Ignores all parameters: products priced above 30, cheapest first, with
/// name and price only.
#[utoipa::path(
    get,
    path = "/api/v1/products/static",
    tag = "products",
    responses(
        (status = 200, description = "Products priced above 30", body = ProductsEnvelope),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_products_static<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<ProductsEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    let data = state
        .db()
        .products()
        .find(&ProductQuery::static_listing())
        .await
        .map_err(internal_error)?;

    Ok(Json(ProductsEnvelope::new("Product testing route", data)))
}
