//! PostgreSQL storage for the time tracker.
//!
//! Rows are read into the `models` row types and converted into core
//! entities; every `sqlx::Error` leaves this crate as
//! [`CoreError::StorageFailure`].

use sqlx::postgres::PgPoolOptions;
use timekeeper_core::error::CoreError;

pub mod models;
pub mod repositories;

pub use repositories::PgStores;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub(crate) fn storage_error(e: sqlx::Error) -> CoreError {
    tracing::error!(error = %e, "Database error");
    CoreError::StorageFailure(e.to_string())
}
