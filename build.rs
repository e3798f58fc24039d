//! Build script for embedding SQL migrations.
//!
//! `sqlx::migrate!` embeds the migration files at compile time, so cargo
//! has to be told to rebuild when they change.

fn main() {
    println!("cargo:rerun-if-changed=data/sql/sqlite");
}
