//! Catalog API server binary.
//!
//! This binary creates the concrete database implementation and passes it
//! to the API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;

use catalog::api::{self, ApiError, Config};
use catalog::db::{Database, DbError, SqliteDatabase};
use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "catalog-api")]
#[command(author, version, about = "Product catalog API server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (defaults to $PORT, then 8000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Database URL (defaults to $DATABASE_URL, then sqlite://catalog.db?mode=rwc)
    #[arg(long)]
    database_url: Option<String>,

    /// Cap for the `limit` query parameter (defaults to $CATALOG_MAX_LIMIT, 0 disables)
    #[arg(long)]
    max_limit: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new();
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(url) = self.database_url {
            config = config.with_database_url(url);
        }
        if let Some(max_limit) = self.max_limit {
            config = config.with_max_limit(max_limit);
        }
        config
    }
}

async fn run(config: Config) -> Result<(), BinaryError> {
    info!("Opening database at {}", config.database_url);

    // A store that cannot be reached is fatal
    let db = SqliteDatabase::open(&config.database_url).await?;

    db.migrate().await?;
    info!("Database migrations complete");

    // Pass the abstract Database to the API layer
    api::run(config, db).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = Cli::parse().into_config();
    api::init_tracing();
    run(config).await?;
    Ok(())
}
