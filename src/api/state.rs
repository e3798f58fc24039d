//! Application state for the API server.

use std::sync::Arc;

use crate::db::Database;

/// Shared application state.
///
/// Generic over `D: Database` so handlers work with any storage backend;
/// the database is injected via the constructor, never created internally.
pub struct AppState<D: Database> {
    db: Arc<D>,
    max_limit: Option<u64>,
}

// Manual Clone impl - only the Arc needs cloning, not D
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            max_limit: self.max_limit,
        }
    }
}

impl<D: Database> AppState<D> {
    /// Create a new AppState with the given database and page size cap.
    pub fn new(db: D, max_limit: Option<u64>) -> Self {
        Self {
            db: Arc::new(db),
            max_limit,
        }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }

    /// Upper bound for the `limit` query parameter, if configured.
    pub fn max_limit(&self) -> Option<u64> {
        self.max_limit
    }
}
