//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{NewProduct, ProductDocument, ProductQuery},
};

/// Repository for Product operations.
pub trait ProductRepository: Send + Sync {
    /// Find products matching the query.
    ///
    /// Applies filter, sort, skip and limit in the store, then projects each
    /// product to the requested fields.
    fn find(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = DbResult<Vec<ProductDocument>>> + Send;

    /// Replace the whole collection with `products`.
    ///
    /// Every record is validated first; nothing is written if any fails.
    /// Returns the number of products inserted.
    fn replace_all(&self, products: &[NewProduct]) -> impl Future<Output = DbResult<usize>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync + 'static {
    type Products<'a>: ProductRepository
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the product repository.
    fn products(&self) -> Self::Products<'_>;
}
