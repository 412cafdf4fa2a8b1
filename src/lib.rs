#![allow(clippy::doc_markdown)] // Allow technical terms like SQLite, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Job Tracker Core
//!
//! Storage and query core for a job-application tracker, backed by a single
//! SQLite table.
//!
//! ## Overview
//!
//! One record type (a job application) is managed through a small operation
//! surface:
//!
//! - **List / Count** over one shared filter predicate, so a count always
//!   equals the number of rows reachable by paging through the list
//! - **Partial Update** as an atomic read-merge-write inside one write
//!   transaction; concurrent updates to disjoint fields all survive
//! - **Stats** aggregating status counts, salary range and recent activity
//! - **Create / Get / Delete**
//!
//! Every operation accepts an [`OperationContext`](context::OperationContext)
//! carrying cancellation and an optional deadline.
//!
//! ## Module Organization
//!
//! - [`store`] - Operation surface and SQLite-backed implementation
//! - [`models`] - Application rows, listing queries, statistics
//! - [`query_builder`] - Predicate, sort, pagination and SQL rendering
//! - [`database`] - Connection pool and schema bootstrap
//! - [`context`] - Cancellation and deadlines
//! - [`config`] - Layered configuration
//! - [`validation`] - Request validation
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jobtrack_core::config::ConfigManager;
//! use jobtrack_core::context::OperationContext;
//! use jobtrack_core::logging::init_structured_logging;
//! use jobtrack_core::store::{ApplicationRepository, ApplicationStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! init_structured_logging(&manager.config().logging);
//!
//! let store = ApplicationStore::open(manager.config()).await?;
//! let stats = store.stats(&OperationContext::background()).await?;
//! println!("Tracking {} applications", stats.total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod store;
pub mod utils;
pub mod validation;

pub use crate::config::{ConfigManager, TrackerConfig};
pub use crate::constants::ApplicationStatus;
pub use crate::context::OperationContext;
pub use crate::error::{Result, TrackerError};
pub use crate::models::{
    Application, ApplicationChanges, ApplicationFilter, ApplicationStats, ListQuery,
    NewApplication,
};
pub use crate::query_builder::{Pagination, PaginationMeta, Sort, SortColumn, SortDirection};
pub use crate::store::{ApplicationRepository, ApplicationStore, PaginatedApplications};
