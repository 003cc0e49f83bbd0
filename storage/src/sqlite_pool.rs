//! SQLite pool construction for the storage crate.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Connects to the given database URL (`sqlite:bot.db`, `sqlite::memory:`),
/// creating the database file if missing. A single connection covers the
/// bots' write volume and keeps in-memory databases coherent across queries.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    info!("Connecting SQLite pool: {}", database_url);

    let options: SqliteConnectOptions = database_url.parse()?;
    let options = options.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}
