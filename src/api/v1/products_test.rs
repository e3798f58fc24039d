//! Integration tests for Product API endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::db::{
    Database, DbError, DbResult, NewProduct, ProductDocument, ProductQuery, ProductRepository,
    SqliteDatabase,
};

fn product(name: &str, price: f64, rating: f64, company: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price,
        featured: false,
        rating: Some(rating),
        created_at: None,
        company: Some(company.to_string()),
    }
}

/// Create a test app with an in-memory database seeded with `products`
async fn test_app_with(products: &[NewProduct], max_limit: Option<u64>) -> axum::Router {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    db.products().replace_all(products).await.unwrap();
    routes::create_router(AppState::new(db, max_limit))
}

/// Five products, exactly one of which is priced above 30 with rating >= 4
async fn test_app() -> axum::Router {
    let mut featured = product("simple chair", 23.0, 4.0, "liddy");
    featured.featured = true;

    test_app_with(
        &[
            product("accent chair", 25.0, 4.0, "marcos"),
            product("bar stool", 35.0, 4.0, "ikea"),
            product("dining table", 42.0, 2.0, "caressa"),
            product("shelf", 18.0, 3.0, "ikea"),
            featured,
        ],
        None,
    )
    .await
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn names(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .expect("Expected data array")
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

// =============================================================================
// GET /api/v1/products
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_products_returns_envelope() {
    let (status, body) = get(test_app().await, "/api/v1/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Products fetched");
    assert_eq!(body["numOfHits"], 5);
    assert_eq!(
        names(&body),
        vec![
            "accent chair",
            "bar stool",
            "dining table",
            "shelf",
            "simple chair"
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_with_numeric_filters() {
    let (status, body) = get(
        test_app().await,
        "/api/v1/products?numericFilters=price%3E30,rating%3E%3D4",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["numOfHits"], 1);
    assert_eq!(
        body["data"],
        serde_json::json!([{"name": "bar stool", "price": 35, "rating": 4}])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_projection_ignores_fields_override() {
    let (_, body) = get(
        test_app().await,
        "/api/v1/products?fields=company,-price,_id",
    )
    .await;

    for product in body["data"].as_array().unwrap() {
        let object = product.as_object().unwrap();
        assert!(!object.contains_key("_id"));
        assert!(object.contains_key("name"));
        assert!(object.contains_key("price"));
        assert!(object.contains_key("rating"));
        assert!(object.contains_key("company"));
        assert!(!object.contains_key("featured"));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_filters_featured() {
    let (_, body) = get(test_app().await, "/api/v1/products?featured=true").await;
    assert_eq!(names(&body), vec!["simple chair"]);

    let (_, body) = get(test_app().await, "/api/v1/products?featured=nope").await;
    assert_eq!(body["numOfHits"], 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_keeps_first_repeated_parameter() {
    let (status, body) = get(
        test_app().await,
        "/api/v1/products?featured=true&featured=false",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(names(&body), vec!["simple chair"]);

    let (status, body) = get(test_app().await, "/api/v1/products?limit=2&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["numOfHits"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_unknown_company_is_empty() {
    let (status, body) = get(test_app().await, "/api/v1/products?company=walmart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["numOfHits"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_name_search() {
    let (_, body) = get(test_app().await, "/api/v1/products?name=CHAIR").await;
    assert_eq!(names(&body), vec!["accent chair", "simple chair"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_name_search_folds_non_ascii() {
    let app = test_app_with(&[product("Ägg chair", 20.0, 4.0, "ikea")], None).await;

    let (status, body) = get(app.clone(), "/api/v1/products?name=%C3%A4gg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Ägg chair"]);

    let (_, body) = get(app, "/api/v1/products?name=%C3%84GG").await;
    assert_eq!(body["numOfHits"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_sort_and_paginate() {
    let (_, body) = get(
        test_app().await,
        "/api/v1/products?sort=-price&page=2&limit=2",
    )
    .await;
    assert_eq!(names(&body), vec!["accent chair", "simple chair"]);
    assert_eq!(body["numOfHits"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_tolerates_malformed_parameters() {
    let (status, body) = get(
        test_app().await,
        "/api/v1/products?numericFilters=price%3Eabc,weight%3C3&page=abc&limit=-1&sort=bogus",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["numOfHits"], 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_products_respects_limit_cap() {
    let products: Vec<NewProduct> = (1..=8)
        .map(|i| product(&format!("item {i}"), i as f64, 3.0, "ikea"))
        .collect();
    let app = test_app_with(&products, Some(3)).await;

    let (_, body) = get(app, "/api/v1/products?limit=100").await;
    assert_eq!(body["numOfHits"], 3);
}

// =============================================================================
// GET /api/v1/products/static
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn static_route_returns_products_above_30_by_price() {
    let app = test_app_with(
        &[
            product("shelf", 50.0, 3.0, "ikea"),
            product("lamp", 10.0, 3.0, "ikea"),
            product("desk", 40.0, 3.0, "liddy"),
            product("stool", 25.0, 3.0, "marcos"),
        ],
        None,
    )
    .await;

    let (status, body) = get(app, "/api/v1/products/static?price=1&sort=-price").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product testing route");
    assert_eq!(body["numOfHits"], 2);
    assert_eq!(names(&body), vec!["desk", "shelf"]);

    let first = body["data"][0].as_object().unwrap();
    let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["_id", "name", "price"]);
}

// =============================================================================
// Fallback and error handling
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn unknown_route_returns_404_envelope() {
    let (status, body) = get(test_app().await, "/api/v1/orders").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route does not exist");
}

#[tokio::test(flavor = "multi_thread")]
async fn health_returns_ok() {
    let (status, body) = get(test_app().await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

/// Database double whose queries always fail.
struct FailingDatabase;

struct FailingProducts;

impl ProductRepository for FailingProducts {
    async fn find(&self, _query: &ProductQuery) -> DbResult<Vec<ProductDocument>> {
        Err(DbError::Database {
            message: "database is locked".to_string(),
        })
    }

    async fn replace_all(&self, _products: &[NewProduct]) -> DbResult<usize> {
        Ok(0)
    }
}

impl Database for FailingDatabase {
    type Products<'a> = FailingProducts;

    async fn migrate(&self) -> DbResult<()> {
        Ok(())
    }

    fn products(&self) -> Self::Products<'_> {
        FailingProducts
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn store_failure_returns_500_envelope() {
    let app = routes::create_router(AppState::new(FailingDatabase, None));

    for uri in ["/api/v1/products", "/api/v1/products/static"] {
        let (status, body) = get(app.clone(), uri).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "uri {uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Database error: database is locked");
    }
}
