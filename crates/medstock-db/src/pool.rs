//! # Database Handle
//!
//! Opens the SQLite pool, applies the schema and hands out stores.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("./medstock.db")          DbConfig::in_memory()          │
//! │    WAL journal, NORMAL sync,               one pinned connection,       │
//! │    foreign keys, create if missing         foreign keys                 │
//! │              │                                      │                   │
//! │              └──────────────► Database::new ◄───────┘                   │
//! │                                   │  migrations                         │
//! │                                   ▼                                     │
//! │      medications() / store()   categories()   suppliers()               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::medication::SqliteMedicationStore;
use crate::repository::reference::{CategoryRepository, SupplierRepository};
use crate::store::MedicationStore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Pool settings.
///
/// ```rust
/// use std::time::Duration;
/// use medstock_db::DbConfig;
///
/// let config = DbConfig::new("./medstock.db")
///     .max_connections(8)
///     .connect_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    location: Location,
    max_connections: u32,
    min_connections: u32,
    connect_timeout: Duration,
    migrate: bool,
}

impl DbConfig {
    /// A file-backed database. The file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: Location::File(path.into()),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            migrate: true,
        }
    }

    /// A private in-memory database, used by tests.
    ///
    /// Each SQLite in-memory connection is a separate database, so the pool
    /// holds exactly one connection and never recycles it.
    pub fn in_memory() -> Self {
        DbConfig {
            location: Location::Memory,
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            migrate: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// How long a request waits for a free connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.migrate = run;
        self
    }

    fn describe(&self) -> String {
        match &self.location {
            Location::File(path) => path.display().to_string(),
            Location::Memory => "in-memory".to_string(),
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            Location::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            Location::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true))
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout);

        match self.location {
            Location::File(_) => pool.idle_timeout(Some(Duration::from_secs(600))),
            Location::Memory => pool
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database. Cloning shares the pool.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new(&config.database_path)).await?;
/// let state = AppState::new(db.store());
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let options = config.connect_options()?;
        debug!(database = %config.describe(), "Opening SQLite pool");

        let pool = config
            .pool_options()
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            database = %config.describe(),
            max_connections = config.max_connections,
            "Database opened"
        );

        let db = Database { pool };
        if config.migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool access for the seed tool and test fixtures.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn medications(&self) -> SqliteMedicationStore {
        SqliteMedicationStore::new(self.pool.clone())
    }

    /// The medication store as the trait object the API is built on.
    pub fn store(&self) -> Arc<dyn MedicationStore> {
        Arc::new(self.medications())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections and closes the pool. Every later
    /// query fails.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
