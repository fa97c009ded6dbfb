//! # SQLite Store
//!
//! Durable [`PersistedStore`] backed by a single SQLite file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Session Store                               │
//! │                                                                         │
//! │  Host startup                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(path) ← Configure pool settings                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStore::open(config).await ← Create pool + run migrations        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────┐                          │
//! │  │  kv_store                                │                          │
//! │  │  ┌────────────┬──────────┬────────────┐  │                          │
//! │  │  │ key (PK)   │ value    │ updated_at │  │                          │
//! │  │  ├────────────┼──────────┼────────────┤  │                          │
//! │  │  │ username   │ alice    │ ...        │  │                          │
//! │  │  │ role       │ Cashier  │ ...        │  │                          │
//! │  │  │ employeeId │ 42       │ ...        │  │                          │
//! │  │  └────────────┴──────────┴────────────┘  │                          │
//! │  └──────────────────────────────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File-backed stores run with WAL journaling and `NORMAL` synchronous, the
//! same trade-off as any local app database: readers never block the
//! writer, and a crash loses at most the last transaction.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::store::PersistedStore;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/session.db").max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one writer context, occasional reader)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 10 seconds
    pub connect_timeout: Duration,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a configuration for the file at `path`. The file is created
    /// if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
            run_migrations: true,
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

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// The single pooled connection is never recycled, so the data lives as
    /// long as the store.
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// SqliteStore
// =============================================================================

/// SQLite-backed persisted store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (and if needed creates) the store.
    ///
    /// ## What This Does
    /// 1. Creates the parent directory and the file if they don't exist
    /// 2. Configures WAL mode and `NORMAL` synchronous for file stores
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening session store"
        );

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        } else {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
                }
            }
            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout);
        if config.is_in_memory() {
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "Session store pool created");

        let store = SqliteStore { pool };
        if config.run_migrations {
            migrations::run_migrations(&store.pool).await?;
        }

        Ok(store)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks that the store can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the pool. Every later operation fails with
    /// [`StoreError::Unavailable`].
    pub async fn close(&self) {
        info!("Closing session store");
        self.pool.close().await;
    }
}

const UPSERT_SQL: &str = "INSERT INTO kv_store (key, value, updated_at) \
     VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

const DELETE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

#[async_trait]
impl PersistedStore for SqliteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        debug!(key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        sqlx::query(DELETE_SQL).bind(key).execute(&self.pool).await?;
        debug!(key, "Removed value");
        Ok(())
    }

    /// All entries are written in one transaction.
    async fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(UPSERT_SQL)
                .bind(*key)
                .bind(*value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(count = entries.len(), "Stored values");
        Ok(())
    }

    /// All keys are removed in one transaction.
    async fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query(DELETE_SQL).bind(*key).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        debug!(count = keys.len(), "Removed values");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = SqliteStore::open(StoreConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = StoreConfig::new("/tmp/session.db")
            .max_connections(4)
            .connect_timeout(Duration::from_secs(2))
            .run_migrations(false);

        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(StoreConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_set_get_overwrite_remove() {
        let store = SqliteStore::open(StoreConfig::in_memory()).await.unwrap();

        assert_eq!(store.get("username").await.unwrap(), None);

        store.set("username", "alice").await.unwrap();
        store.set("username", "bob").await.unwrap();
        assert_eq!(store.get("username").await.unwrap().as_deref(), Some("bob"));

        store.remove("username").await.unwrap();
        assert_eq!(store.get("username").await.unwrap(), None);
        store.remove("username").await.unwrap();
    }

    #[tokio::test]
    async fn test_set_many_and_remove_many() {
        let store = SqliteStore::open(StoreConfig::in_memory()).await.unwrap();

        store
            .set_many(&[("username", "alice"), ("role", "Cashier"), ("employeeId", "42")])
            .await
            .unwrap();
        assert_eq!(store.get("role").await.unwrap().as_deref(), Some("Cashier"));
        assert_eq!(store.get("employeeId").await.unwrap().as_deref(), Some("42"));

        store
            .remove_many(&["username", "role", "employeeId"])
            .await
            .unwrap();
        assert_eq!(store.get("username").await.unwrap(), None);
        assert_eq!(store.get("role").await.unwrap(), None);
        assert_eq!(store.get("employeeId").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_store_reports_unavailable() {
        let store = SqliteStore::open(StoreConfig::in_memory()).await.unwrap();
        store.close().await;

        assert!(matches!(
            store.get("username").await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("storefront-store-{}", std::process::id()));
        let path = dir.join("session.db");
        let _ = std::fs::remove_dir_all(&dir);

        {
            let store = SqliteStore::open(StoreConfig::new(&path)).await.unwrap();
            store.set("username", "alice").await.unwrap();
            store.close().await;
        }

        let store = SqliteStore::open(StoreConfig::new(&path)).await.unwrap();
        assert_eq!(store.get("username").await.unwrap().as_deref(), Some("alice"));
        store.close().await;

        let _ = std::fs::remove_dir_all(&dir);
    }
}
