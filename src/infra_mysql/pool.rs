use crate::settings::Database;
use anyhow::{Result, anyhow};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::time::Duration;

/// Builds the pool lazily; the first query opens the first connection.
pub fn connect_lazy(database: &Database) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
        .connect_lazy(&database.url)
        .map_err(|e| anyhow!(e))?;

    Ok(pool)
}
