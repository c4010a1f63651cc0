//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Handle Lifecycle                          │
//! │                                                                         │
//! │  DbConfig::new(path) / DbConfig::from_env()                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │       │                                                                 │
//! │       ├── lazy = false → connect now, ensure schema now                │
//! │       └── lazy = true  → no connection until the first operation       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  database.ready().await  ← every store operation goes through here     │
//! │       │                    schema is ensured exactly once (OnceCell)   │
//! │       ▼                                                                 │
//! │  SqlitePool (open for the rest of the process)                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases use WAL so readers don't block the writer. In-memory
//! databases keep SQLite's default journal.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use crate::schema;

/// File name used when no path is configured.
pub const DEFAULT_DATABASE_FILE: &str = "inventory.db";

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/inventory.db")
///     .max_connections(4)
///     .lazy(true);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 4
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps them forever.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Open the pool on first use instead of at construction.
    /// Default: false
    pub lazy: bool,

    /// Rows buffered ahead of a cursor's reader.
    /// Default: 64
    pub cursor_buffer: usize,

    /// Capacity of the async change-notification channel.
    /// Default: 256
    pub notify_capacity: usize,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            lazy: false,
            cursor_buffer: 64,
            notify_capacity: 256,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// A single connection that never idles out: closing it would discard
    /// the database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            lazy: false,
            cursor_buffer: 64,
            notify_capacity: 64,
        }
    }

    /// Reads configuration from the environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `INVENTORY_DB_PATH` | `inventory.db` |
    /// | `INVENTORY_DB_MAX_CONNECTIONS` | 4 |
    /// | `INVENTORY_DB_CONNECT_TIMEOUT_SECS` | 30 |
    /// | `INVENTORY_DB_LAZY` | false |
    pub fn from_env() -> DbResult<Self> {
        let path = env::var("INVENTORY_DB_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_FILE.into());
        let mut config = if path == IN_MEMORY {
            DbConfig::in_memory()
        } else {
            DbConfig::new(path)
        };

        if let Some(max) = parse_env::<u32>("INVENTORY_DB_MAX_CONNECTIONS")? {
            if max == 0 {
                return Err(DbError::invalid_config("INVENTORY_DB_MAX_CONNECTIONS", "0"));
            }
            config.max_connections = max;
            config.min_connections = config.min_connections.min(max);
        }
        if let Some(secs) = parse_env::<u64>("INVENTORY_DB_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(lazy) = parse_env::<bool>("INVENTORY_DB_LAZY")? {
            config.lazy = lazy;
        }

        Ok(config)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether the pool opens on first use.
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Sets the cursor read-ahead buffer.
    pub fn cursor_buffer(mut self, rows: usize) -> Self {
        self.cursor_buffer = rows.max(1);
        self
    }

    /// Whether this configuration points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            // Readers don't block the writer
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true))
    }
}

fn parse_env<T: FromStr>(key: &str) -> DbResult<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DbError::invalid_config(key, raw)),
        Err(_) => Ok(None),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Shared database handle.
///
/// Cheap to clone; clones share the pool and the schema-ready flag.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Set once the schema has been ensured.
    schema: Arc<OnceCell<()>>,
}

impl Database {
    /// Creates the connection pool.
    ///
    /// ## What This Does
    /// 1. Builds connection options (WAL + NORMAL sync for files)
    /// 2. Creates the pool, eagerly or lazily per `config.lazy`
    /// 3. For eager pools, ensures the schema right away
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            lazy = config.lazy,
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);
        // An in-memory database lives exactly as long as its connection
        let pool_options = if config.is_in_memory() {
            pool_options.max_lifetime(None::<Duration>)
        } else {
            pool_options
        };

        let pool = if config.lazy {
            pool_options.connect_lazy_with(connect_options)
        } else {
            pool_options
                .connect_with(connect_options)
                .await
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        };

        info!(max_connections = config.max_connections, "Database pool created");

        let db = Database {
            pool,
            schema: Arc::new(OnceCell::new()),
        };

        if !config.lazy {
            db.ready().await?;
        }

        Ok(db)
    }

    /// Returns the pool once the schema is in place.
    ///
    /// The first call ensures the schema; later calls return immediately.
    /// A failed attempt is retried on the next call.
    pub async fn ready(&self) -> DbResult<&SqlitePool> {
        self.schema
            .get_or_try_init(|| schema::ensure_schema(&self.pool))
            .await?;
        Ok(&self.pool)
    }

    /// Drops and recreates the product table.
    pub async fn recreate_schema(&self) -> DbResult<()> {
        schema::recreate(&self.pool).await?;
        // The table now exists at the current version either way
        let _ = self.schema.set(());
        Ok(())
    }

    /// Returns a reference to the connection pool without ensuring the schema.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Closes the pool. Later operations fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
        assert_eq!(
            schema::schema_version(db.pool()).await.unwrap(),
            schema::SCHEMA_VERSION
        );
    }

    #[tokio::test]
    async fn test_lazy_database_defers_schema() {
        let db = Database::new(DbConfig::in_memory().lazy(true)).await.unwrap();
        assert_eq!(schema::schema_version(db.pool()).await.unwrap(), 0);

        db.ready().await.unwrap();
        assert_eq!(
            schema::schema_version(db.pool()).await.unwrap(),
            schema::SCHEMA_VERSION
        );
    }

    #[tokio::test]
    async fn test_closed_pool_reports_connection_failure() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_defaults_to_eager_open() {
        assert!(!DbConfig::new("/tmp/test.db").lazy);
        assert!(!DbConfig::in_memory().lazy);
        assert_eq!(DbConfig::new("/tmp/test.db").notify_capacity, 256);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .lazy(true)
            .cursor_buffer(0);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(config.lazy);
        assert_eq!(config.cursor_buffer, 1);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[test]
    fn test_parse_env_values() {
        std::env::set_var("INVENTORY_TEST_PARSE_OK", " 7 ");
        std::env::set_var("INVENTORY_TEST_PARSE_BAD", "seven");

        assert_eq!(parse_env::<u32>("INVENTORY_TEST_PARSE_OK").unwrap(), Some(7));
        assert_eq!(parse_env::<u32>("INVENTORY_TEST_PARSE_UNSET").unwrap(), None);
        assert!(matches!(
            parse_env::<u32>("INVENTORY_TEST_PARSE_BAD"),
            Err(DbError::InvalidConfig { .. })
        ));
    }
}
