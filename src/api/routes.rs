//! API route configuration.

use axum::Router;
use axum::routing::get;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{self, HealthResponse};
use super::state::AppState;
use super::v1::{self, ErrorResponse, ProductsEnvelope};
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Read-only product catalog with filtering, sorting, field selection and pagination",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        v1::list_products,
        v1::list_products_static,
    ),
    components(
        schemas(
            HealthResponse,
            ProductsEnvelope,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router<D: Database>(state: AppState<D>) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    // Product routes (generic over Database)
    let product_routes = routes!(D => {
        get "/api/v1/products" => v1::list_products,
        get "/api/v1/products/static" => v1::list_products_static,
    });

    system_routes
        .merge(product_routes)
        .merge(Scalar::with_url("/docs", api))
        .fallback(handlers::not_found)
        .with_state(state)
}
