//! Catalog seeding binary.
//!
//! Replaces the product collection with the contents of a JSON dataset.

use std::path::PathBuf;

use catalog::api::{self, Config};
use catalog::db::{Database, SqliteDatabase};
use catalog::seed::{self, SeedError};
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "catalog-seed")]
#[command(author, version, about = "Load a product dataset into the catalog", long_about = None)]
struct Cli {
    /// JSON array of products to load
    #[arg(short, long, default_value = "data/products.json")]
    file: PathBuf,

    /// Database URL (defaults to $DATABASE_URL, then sqlite://catalog.db?mode=rwc)
    #[arg(long)]
    database_url: Option<String>,
}

async fn run(cli: Cli) -> Result<usize, SeedError> {
    let products = seed::load_products(&cli.file).await?;
    info!(count = products.len(), file = %cli.file.display(), "dataset loaded");

    let url = cli
        .database_url
        .unwrap_or_else(|| Config::new().database_url);
    let db = SqliteDatabase::open(&url).await?;
    db.migrate().await?;

    seed::seed(&db, &products).await
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    api::init_tracing();
    let inserted = run(cli).await?;
    info!(inserted, "seeding finished");
    Ok(())
}
