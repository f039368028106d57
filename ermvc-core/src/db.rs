//! Database handle (feature `database`).
//!
//! One [`Database`] is created at startup and carried in the application
//! state. `sqlx::AnyPool` picks the driver from the URL scheme
//! (`sqlite:`, `postgres:`).

use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::AnyPool;

use crate::config::MvcConfig;

/// Error type for database setup and access.
#[derive(Debug)]
pub enum DatabaseError {
    /// `database.url` / `DATABASE_URL` is not set.
    NotConfigured,
    /// The pool could not be created.
    Connect(sqlx::Error),
    /// A query failed.
    Query(sqlx::Error),
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::NotConfigured => {
                write!(f, "Database is not configured (set DATABASE_URL or database.url)")
            }
            DatabaseError::Connect(err) => write!(f, "Failed to connect to database: {err}"),
            DatabaseError::Query(err) => write!(f, "Database query failed: {err}"),
        }
    }
}

impl std::error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatabaseError::NotConfigured => None,
            DatabaseError::Connect(err) | DatabaseError::Query(err) => Some(err),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::Query(err)
    }
}

/// Connection pool shared by the application.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connect to `url`.
    pub async fn connect(url: &str) -> Result<Self, DatabaseError> {
        Self::connect_with(url, 5).await
    }

    pub async fn connect_with(url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(DatabaseError::Connect)?;
        tracing::info!(max_connections, "Database connected");
        Ok(Self { pool })
    }

    /// Connect using `database.url` and `database.max_connections` (default 5).
    pub async fn from_config(config: &MvcConfig) -> Result<Self, DatabaseError> {
        let url = config
            .get_str("database.url")
            .ok_or(DatabaseError::NotConfigured)?;
        let max_connections = config.get_or::<u32>("database.max_connections", 5);
        Self::connect_with(&url, max_connections).await
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Run a statement without results, returning the affected row count.
    pub async fn execute(&self, sql: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query(sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn fetch_all(&self, sql: &str) -> Result<Vec<AnyRow>, DatabaseError> {
        Ok(sqlx::query(sql).fetch_all(&self.pool).await?)
    }

    /// Close every connection. Further queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connections closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
