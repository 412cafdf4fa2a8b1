//! # Data Layer Models
//!
//! Row types and query operations for the `applications` table, plus the
//! listing query types and the computed statistics view.

pub mod application;
pub mod filter;
pub mod stats;

pub use application::{Application, ApplicationChanges, NewApplication, StagedUpdate};
pub use filter::{ApplicationFilter, ListQuery};
pub use stats::{ApplicationStats, RecentActivity, SalaryRange};
