use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::filter::FilterError;

const PRODUCTS_MIGRATION: &str = include_str!("../../migrations/0001_products.sql");

/// Store errors, classified so that driver text never leaves this layer
/// except through logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("page number and size must be greater than 0")]
    InvalidPaging,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("migration failed: {0}")]
    Migration(String),
}

const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                DatabaseError::AlreadyExists(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::Connection(err.to_string())
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<FilterError> for DatabaseError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::InvalidPaging => DatabaseError::InvalidPaging,
            other => DatabaseError::QueryFailed(other.to_string()),
        }
    }
}

/// Owns the connection pool for the product store.
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.open_connection_timeout())
            .idle_timeout(config.idle_connection_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        info!(max_connections = config.max_connections, "database pool ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the embedded schema. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        // Simple query protocol; the script holds several statements.
        self.pool
            .execute(PRODUCTS_MIGRATION)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        info!("product schema applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_not_found() {
        assert!(matches!(
            DatabaseError::from(sqlx::Error::RowNotFound),
            DatabaseError::NotFound(_)
        ));
    }

    #[test]
    fn other_driver_errors_are_query_failures() {
        assert!(matches!(
            DatabaseError::from(sqlx::Error::ColumnNotFound("x".into())),
            DatabaseError::QueryFailed(_)
        ));
    }

    #[test]
    fn invalid_paging_survives_classification() {
        assert_eq!(DatabaseError::from(FilterError::InvalidPaging), DatabaseError::InvalidPaging);
    }

    #[test]
    fn migration_is_idempotent_sql() {
        assert!(PRODUCTS_MIGRATION.contains("CREATE TABLE IF NOT EXISTS products"));
        assert!(PRODUCTS_MIGRATION.contains("UNIQUE (name)"));
    }
}
