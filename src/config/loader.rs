//! Configuration Loader
//!
//! Layers configuration sources, lowest precedence first:
//! 1. built-in defaults
//! 2. a TOML file (`config/tracker.toml` unless a path is given)
//! 3. `TRACKER__`-prefixed environment variables, `__` separating sections
//!    (`TRACKER__DATABASE__PATH`, `TRACKER__QUERY__MAX_LIMIT`)
//! 4. the legacy `DB_PATH` variable, overriding `database.path`

use super::TrackerConfig;
use crate::error::{Result, TrackerError};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "config/tracker.toml";
pub const ENV_PREFIX: &str = "TRACKER";
pub const LEGACY_DB_PATH_VAR: &str = "DB_PATH";

fn configuration_error(error: ::config::ConfigError) -> TrackerError {
    TrackerError::Configuration(error.to_string())
}

pub struct ConfigManager {
    config: TrackerConfig,
    config_file: PathBuf,
}

impl ConfigManager {
    /// Load from the default file location and the process environment.
    pub fn load() -> Result<Arc<ConfigManager>> {
        Self::load_from_file(None)
    }

    /// Load from an explicit file (which must then exist) and the process
    /// environment.
    pub fn load_from_file(path: Option<&Path>) -> Result<Arc<ConfigManager>> {
        Self::load_with(path, None)
    }

    /// Load with an explicit environment map instead of the process
    /// environment. Useful in tests that must not touch global state.
    pub fn load_with(
        path: Option<&Path>,
        environment: Option<HashMap<String, String>>,
    ) -> Result<Arc<ConfigManager>> {
        let (config_file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        debug!(
            config_file = %config_file.display(),
            required = required,
            "Loading tracker configuration"
        );

        let legacy_db_path = match &environment {
            Some(vars) => vars.get(LEGACY_DB_PATH_VAR).cloned(),
            None => env::var(LEGACY_DB_PATH_VAR).ok(),
        };

        let mut builder = ::config::Config::builder()
            .add_source(
                ::config::Config::try_from(&TrackerConfig::default())
                    .map_err(configuration_error)?,
            )
            .add_source(::config::File::from(config_file.clone()).required(required))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(environment),
            );

        if let Some(db_path) = legacy_db_path.filter(|p| !p.trim().is_empty()) {
            builder = builder
                .set_override("database.path", db_path)
                .map_err(configuration_error)?;
        }

        let config: TrackerConfig = builder
            .build()
            .and_then(|raw| raw.try_deserialize())
            .map_err(configuration_error)?;

        config.validate()?;

        debug!(
            database_path = %config.database.path,
            max_connections = config.database.max_connections,
            max_limit = config.query.max_limit,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            config_file,
        }))
    }

    /// Wrap an already-built configuration after validating it.
    pub fn from_config(config: TrackerConfig) -> Result<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }))
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// File consulted during loading (it may not have existed)
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }
}
