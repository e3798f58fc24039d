//! Read-only product catalog served over HTTP.
//!
//! - `api`: axum router, handlers and the query-string translator
//! - `db`: storage abstraction and its SQLite implementation
//! - `seed`: loading a JSON dataset into the catalog

pub mod api;
pub mod db;
pub mod seed;
