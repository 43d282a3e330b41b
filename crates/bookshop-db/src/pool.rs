//! # Database Handle
//!
//! Connection setup and lifecycle for the bookshop's SQLite database.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Handle Lifecycle                          │
//! │                                                                         │
//! │  DbConfig::new(path) / DbConfig::in_memory()                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← open connection + create schema         │
//! │       │                                                                 │
//! │       ├──► db.books()     → BookRepository                              │
//! │       ├──► db.orders()    → OrderRepository                             │
//! │       └──► db.accounts()  → AccountRepository                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.close().await  (or drop the last clone)                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle holds one logical connection by default. Repositories clone
//! the handle, so they all share it; statements from concurrent callers are
//! serialized on that connection.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::account::AccountRepository;
use crate::repository::book::BookRepository;
use crate::repository::order::OrderRepository;
use crate::schema;

/// Environment variable that overrides the database file location.
pub const DB_PATH_ENV: &str = "BOOKSHOP_DB_PATH";

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "./bookshop.db";

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/bookshop.db")
///     .enforce_foreign_keys(true)
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections.
    /// Default: 1 (a single logical connection)
    pub max_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes; `None` for in-memory databases, whose data lives
    /// only as long as the connection does.
    pub idle_timeout: Option<Duration>,

    /// Whether to create missing tables on connect.
    /// Default: true
    pub create_schema: bool,

    /// Whether SQLite enforces the declared foreign keys.
    /// Default: false (the repositories check references themselves)
    pub enforce_foreign_keys: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            create_schema: true,
            enforce_foreign_keys: false,
        }
    }

    /// Configuration from the environment.
    ///
    /// Uses `BOOKSHOP_DB_PATH` when set, otherwise `./bookshop.db`.
    pub fn from_env() -> Self {
        let path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        DbConfig::new(path)
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Every call yields an isolated database.
    pub fn in_memory() -> Self {
        DbConfig {
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            ..DbConfig::new(IN_MEMORY)
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to create the schema on connect.
    pub fn create_schema(mut self, create: bool) -> Self {
        self.create_schema = create;
        self
    }

    /// Sets whether SQLite enforces foreign keys.
    pub fn enforce_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }

    /// True when the configuration targets an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            // sqlite://path creates file if not exists
            let url = format!("sqlite://{}?mode=rwc", self.database_path.display());
            SqliteConnectOptions::from_str(&url)
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
                // WAL mode: readers don't block writers
                .journal_mode(SqliteJournalMode::Wal)
                .create_if_missing(true)
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(self.enforce_foreign_keys))
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig::from_env()
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Opening is the constructor ([`Database::new`]); releasing is
/// [`Database::close`]. Dropping the last clone also releases the
/// connection.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::in_memory()).await?;
/// let book = db.books().get(1).await?;
/// db.close().await;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL for files, foreign keys per config)
    /// 3. Opens the connection
    /// 4. Creates missing tables (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening database"
        );

        let connect_options = config.connect_options()?;
        debug!(
            foreign_keys = config.enforce_foreign_keys,
            "Connection options configured"
        );

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .min_connections(1)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);
        if config.is_in_memory() {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Database opened");

        let db = Database { pool };

        if config.create_schema {
            db.create_schema().await?;
        }

        Ok(db)
    }

    /// Shorthand for an isolated in-memory database with schema.
    pub async fn in_memory() -> DbResult<Self> {
        Database::new(DbConfig::in_memory()).await
    }

    /// Creates any missing tables. Idempotent.
    pub async fn create_schema(&self) -> DbResult<()> {
        schema::create_schema(&self.pool).await
    }

    /// Returns a reference to the underlying pool.
    ///
    /// For ad-hoc queries not covered by the repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the books repository.
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Returns the orders repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Returns the accounts repository.
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }

    /// Closes the connection.
    ///
    /// After calling close, all repository operations fail with
    /// `DbError::ConnectionFailed`. For in-memory databases the data is gone.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// True once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
