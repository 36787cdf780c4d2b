//! Connection management for the read-only association store.
//!
//! The store is a single SQLite file produced by the data-prep pipeline.
//! Connections may execute one statement at a time, so the request-level
//! fan-out interleaves cooperatively over the pool rather than running
//! statements in parallel.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, warn};

mod locus_repository;
mod table_repository;

pub use locus_repository::LocusRepository;
pub use table_repository::TableRepository;

use crate::query::TableMapping;

/// Database configuration, environment-driven with sensible defaults.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://postgap.db?mode=ro".to_string()),
            max_connections: std::env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

/// Connection manager wrapping the SQLite pool.
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// Create a new database manager with the given configuration.
    pub async fn new(config: DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("connecting to association store: {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)?;

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout);

        if let Some(idle_timeout) = config.idle_timeout {
            pool_options = pool_options.idle_timeout(idle_timeout);
        }

        if let Some(max_lifetime) = config.max_lifetime {
            pool_options = pool_options.max_lifetime(max_lifetime);
        }

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            warn!("failed to connect to association store: {}", e);
            e
        })?;

        info!("association store pool created");

        Ok(Self { pool })
    }

    /// Create a new database manager with default configuration.
    pub async fn with_default_config() -> Result<Self, sqlx::Error> {
        Self::new(DatabaseConfig::default()).await
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a locus repository using this connection pool.
    pub fn locus_repository(&self, mapping: TableMapping) -> LocusRepository {
        LocusRepository::new(self.pool.clone(), mapping)
    }

    /// Create a table repository using this connection pool.
    pub fn table_repository(&self, mapping: TableMapping) -> TableRepository {
        TableRepository::new(self.pool.clone(), mapping)
    }
}
