use crate::config::DatabaseConfig;
use crate::database::migrations::DatabaseMigrations;
use crate::error::{Result, TrackerError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Owns the connection pool for one SQLite database.
///
/// Opening creates the parent directory of a file database and bootstraps
/// the schema. `:memory:` databases are private to a connection, so their
/// pool is pinned to a single connection that is never recycled.
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let (connect_options, pool_options) = if config.is_in_memory() {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(TrackerError::storage("database.connect"))?
                .busy_timeout(config.busy_timeout());
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .acquire_timeout(config.acquire_timeout());
            (options, pool)
        } else {
            ensure_parent_directory(Path::new(&config.path))?;
            let options = SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(config.create_if_missing)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(config.busy_timeout());
            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .acquire_timeout(config.acquire_timeout());
            (options, pool)
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(TrackerError::storage("database.connect"))?;

        DatabaseMigrations::run(&pool)
            .await
            .map_err(TrackerError::storage("database.migrate"))?;

        info!(
            path = %config.path,
            max_connections = config.max_connections,
            "Opened application database"
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> std::result::Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;

        let health: i64 = row.try_get("health")?;
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
        debug!("Closed application database pool");
    }
}

fn ensure_parent_directory(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| TrackerError::StorageFailure {
                operation: "database.create_directory",
                source: sqlx::Error::Io(e),
            })?;
            debug!(directory = %parent.display(), "Created database directory");
            Ok(())
        }
        _ => Ok(()),
    }
}
