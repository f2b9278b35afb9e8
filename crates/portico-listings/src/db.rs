//! SQLite pool setup and schema for the listings table.

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::ServiceError;

/// Opens the pool and ensures the schema exists.
pub async fn connect(cfg: &StorageConfig) -> Result<SqlitePool, ServiceError> {
    info!(
        path = %cfg.path,
        pool_size = cfg.pool_size,
        "Opening listings database"
    );

    // A :memory: database exists per connection; keep exactly one so
    // every request sees the same data.
    let max_connections = if cfg.path == ":memory:" {
        1
    } else {
        cfg.pool_size
    };

    let options = SqliteConnectOptions::new()
        .filename(&cfg.path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_millis(cfg.connect_timeout_ms))
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> Result<(), ServiceError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS listings (
            id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            listing_type TEXT NOT NULL,
            price INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    debug!("listings schema ensured");
    Ok(())
}
