//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled for:
//! - Better concurrent read performance
//! - Readers don't block writers, writers don't block readers
//! - Better crash recovery
//!
//! ## Dashboard Statistics
//! The `Database` handle also owns the dashboard statistics cache: the
//! aggregate query behind the sidebar metrics is re-run at most once per
//! 30 seconds, and a failed read degrades to zeroed stats instead of an
//! error (the dashboard must never take the app down).

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::config::ConfigRepository;
use crate::repository::history::{DashboardStats, HistoryRepository};
use crate::repository::tier::TierRepository;

/// How long a dashboard statistics snapshot may be served before the
/// aggregate query is re-run.
pub const STATS_CACHE_TTL: Duration = Duration::from_secs(30);

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/pricewise.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a local desktop app)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The database file will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
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

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Database is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap: the pool and the stats cache are shared behind `Arc`s,
/// so every clone observes the same data and the same cache.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Cached dashboard aggregate with its capture instant.
    stats_cache: Arc<Mutex<Option<(Instant, DashboardStats)>>>,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL journal, NORMAL synchronous, foreign keys)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path with mode=rwc creates the file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            stats_cache: Arc::new(Mutex::new(None)),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations.
    ///
    /// Automatically called by `new()` unless disabled in the config.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Seeds the default logistics tiers and pricing parameters.
    ///
    /// Idempotent: existing tiers and config rows are left untouched, so
    /// this is safe to call on every startup.
    pub async fn bootstrap_defaults(&self) -> DbResult<()> {
        self.tiers().seed_defaults().await?;
        self.config().seed_defaults().await?;
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the logistics tier repository.
    pub fn tiers(&self) -> TierRepository {
        TierRepository::new(self.pool.clone())
    }

    /// Returns the configuration repository.
    pub fn config(&self) -> ConfigRepository {
        ConfigRepository::new(self.pool.clone())
    }

    /// Returns the history repository.
    pub fn history(&self) -> HistoryRepository {
        HistoryRepository::new(self.pool.clone())
    }

    /// Returns dashboard statistics, at most [`STATS_CACHE_TTL`] stale.
    ///
    /// A failed aggregate read logs a warning and returns zeroed stats,
    /// never an error across this boundary.
    pub async fn dashboard_stats(&self) -> DashboardStats {
        let mut cache = self.stats_cache.lock().await;

        if let Some((captured_at, stats)) = *cache {
            if captured_at.elapsed() < STATS_CACHE_TTL {
                return stats;
            }
        }

        let stats = match self.history().stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Dashboard stats query failed, serving zeros");
                DashboardStats::default()
            }
        };

        *cache = Some((Instant::now(), stats));
        stats
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
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
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }

    #[tokio::test]
    async fn test_bootstrap_defaults_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.bootstrap_defaults().await.unwrap();
        db.bootstrap_defaults().await.unwrap();

        let tiers = db.tiers().list().await.unwrap();
        assert_eq!(tiers.len(), 4);
    }

    #[tokio::test]
    async fn test_dashboard_stats_served_from_cache() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.bootstrap_defaults().await.unwrap();

        let first = db.dashboard_stats().await;
        assert_eq!(first.today_count, 0);

        // A record appended inside the TTL window is not visible yet.
        db.history()
            .append(&crate::repository::history::NewHistoryRecord {
                product_name: "cached".to_string(),
                cost: 10.0,
                weight_g: 100.0,
                charge_weight_g: 100.0,
                channel_name: "Petite parcel".to_string(),
                shipping_fee: 5.0,
                final_price: 30.0,
                profit: 10.0,
                margin: 33.0,
            })
            .await
            .unwrap();

        let second = db.dashboard_stats().await;
        assert_eq!(second.today_count, 0);
    }
}
