//! Opening the shared SQLite handle.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Open the single shared connection. Foreign-key enforcement is switched on for it,
/// and the connection is never recycled, so `sqlite::memory:` databases survive for the pool's lifetime.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    tracing::info!(url = %database_url, "database connected");
    Ok(pool)
}
