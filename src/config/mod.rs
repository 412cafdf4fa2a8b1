//! # Tracker Configuration
//!
//! Typed configuration for the store: database connection and pooling, listing
//! limits, and logging output.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jobtrack_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let path = &manager.config().database.path;
//! let max_limit = manager.config().query.max_limit;
//! # Ok(())
//! # }
//! ```

pub mod loader;

use crate::constants::pagination;
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use loader::ConfigManager;

/// Path value selecting a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// SQLite file and pool settings
    pub database: DatabaseConfig,

    /// Listing limits
    pub query: QueryConfig,

    /// Log level and output format
    pub logging: LoggingConfig,
}

/// SQLite database and pool configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`
    pub path: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a writer waits for the engine lock
    pub busy_timeout_ms: u64,
    /// How long a caller waits for a pooled connection
    pub acquire_timeout_ms: u64,
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./data/tracker.db".to_string(),
            max_connections: 5,
            min_connections: 0,
            busy_timeout_ms: 5000,
            acquire_timeout_ms: 30000,
            create_if_missing: true,
        }
    }
}

impl DatabaseConfig {
    /// File-backed database at `path` with default pool settings.
    pub fn at_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::at_path(IN_MEMORY_PATH)
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used when a caller does not pick one
    pub default_limit: u32,
    /// Largest page size accepted
    pub max_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: pagination::DEFAULT_LIMIT,
            max_limit: pagination::MAX_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `jobtrack_core=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl TrackerConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(TrackerError::Configuration(
                "database.path must not be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(TrackerError::Configuration(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(TrackerError::Configuration(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }

        if self.query.default_limit == 0 || self.query.default_limit > self.query.max_limit {
            return Err(TrackerError::Configuration(format!(
                "query.default_limit ({}) must be between 1 and query.max_limit ({})",
                self.query.default_limit, self.query.max_limit
            )));
        }

        Ok(())
    }
}
