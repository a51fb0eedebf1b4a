use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::repository::{TaskRepository, UserRepository};
use crate::database::schema;

/// Errors from the relational store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DatabaseError::UniqueViolation(db_err.message().to_string());
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Handle to the SQLite connection pool, cloned into every request.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for the configured URL.
    ///
    /// In-memory databases live and die with their connection, so they are
    /// pinned to a single connection that is never recycled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connection_timeout));

        pool_options = if Self::is_in_memory(&config.url) {
            pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!("Opened database pool for: {}", config.url);

        Ok(Self { pool })
    }

    /// Fresh private in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let db = Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        })
        .await?;
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Create the users and tasks tables when they are missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        schema::ensure(&self.pool).await
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn tasks(&self) -> TaskRepository {
        TaskRepository::new(self.pool.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_urls() {
        assert!(Database::is_in_memory("sqlite::memory:"));
        assert!(Database::is_in_memory("sqlite://file:todo?mode=memory&cache=shared"));
        assert!(!Database::is_in_memory("sqlite://todo.db?mode=rwc"));
    }

    #[tokio::test]
    async fn health_check_fails_after_close() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.health_check().await.is_ok());

        db.close().await;
        assert!(matches!(db.health_check().await, Err(DatabaseError::Sqlx(_))));
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();
    }
}
