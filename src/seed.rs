//! Seeding the catalog from a JSON dataset.
//!
//! The dataset is a JSON array of products. Seeding replaces the whole
//! collection in one transaction.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use crate::db::{Database, DbError, NewProduct, ProductRepository};

/// Seeding errors.
#[derive(Error, Diagnostic, Debug)]
pub enum SeedError {
    #[error("Failed to read dataset {path}")]
    #[diagnostic(code(catalog::seed::io), help("Pass the dataset path with --file"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset {path} is not a JSON array of products")]
    #[diagnostic(
        code(catalog::seed::parse),
        help("Every product needs at least a name and a price")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),
}

pub type SeedResult<T> = Result<T, SeedError>;

/// Parse a dataset from JSON text.
pub fn parse_products(path: &Path, json: &str) -> SeedResult<Vec<NewProduct>> {
    serde_json::from_str(json).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a dataset file.
pub async fn load_products(path: &Path) -> SeedResult<Vec<NewProduct>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_products(path, &json)
}

/// Replace every product in `db` with `products`.
pub async fn seed<D: Database>(db: &D, products: &[NewProduct]) -> SeedResult<usize> {
    let inserted = db.products().replace_all(products).await?;
    info!(inserted, "catalog seeded");
    Ok(inserted)
}
