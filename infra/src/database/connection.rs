//! Database connection pool management
//!
//! Connection pooling via SQLx with MySQL. Pool sizing and the acquire
//! timeout come from `DatabaseConfig`.

use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use cs_shared::config::DatabaseConfig;

/// Create a MySQL connection pool from the database configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    tracing::info!(
        max_connections = config.max_connections,
        "creating database connection pool"
    );

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await
}

/// Verify the pool can reach the database
pub async fn health_check(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
