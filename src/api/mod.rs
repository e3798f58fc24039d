//! HTTP API for the product catalog.

mod handlers;
pub mod routes;
mod state;
pub mod v1;


use std::env;
use std::net::{IpAddr, Ipv4Addr};

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;
pub use state::AppState;

/// Default connection URL for the catalog database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://catalog.db?mode=rwc";

/// Default port to listen on.
pub const DEFAULT_PORT: u16 = 8000;

/// API server errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind to {addr}")]
    #[diagnostic(
        code(catalog::api::bind),
        help("Is another process listening on this port? Set PORT or pass --port.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error")]
    #[diagnostic(code(catalog::api::serve))]
    Serve(#[source] std::io::Error),
}

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Database connection URL
    pub database_url: String,
    /// Upper bound applied to the `limit` query parameter (unbounded if `None`)
    pub max_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_limit: None,
        }
    }
}

impl Config {
    /// Create a config from the environment.
    ///
    /// Reads `PORT`, `DATABASE_URL` and `CATALOG_MAX_LIMIT`. Unset or
    /// unparseable values keep their defaults.
    pub fn new() -> Self {
        let defaults = Self::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.database_url);

        let max_limit = env::var("CATALOG_MAX_LIMIT")
            .ok()
            .and_then(|l| l.parse().ok())
            .filter(|l| *l > 0);

        Self {
            port,
            database_url,
            max_limit,
            ..defaults
        }
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Cap page sizes; zero removes the cap.
    pub fn with_max_limit(mut self, max_limit: u64) -> Self {
        self.max_limit = (max_limit > 0).then_some(max_limit);
        self
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server with the given configuration and database.
pub async fn run<D: Database>(config: Config, db: D) -> Result<(), ApiError> {
    let state = AppState::new(db, config.max_limit);
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ApiError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(ApiError::Serve)?;
    Ok(())
}
