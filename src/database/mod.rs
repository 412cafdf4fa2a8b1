//! # Database Layer
//!
//! SQLite connection management for the application store.
//!
//! - [`connection`] - pool ownership, connect options, health check
//! - [`migrations`] - idempotent schema bootstrap run on every open
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use jobtrack_core::config::DatabaseConfig;
//! use jobtrack_core::database::DatabaseConnection;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::connect(&DatabaseConfig::at_path("./data/tracker.db")).await?;
//! assert!(db.health_check().await?);
//! db.close().await;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::DatabaseMigrations;
