//! # Query Builder System
//!
//! Structured SQL generation for the application listing and count queries.
//!
//! ## Overview
//!
//! Filters are expressed as tagged [`Condition`] variants over a closed
//! [`Column`] enum and bound [`SqlValue`] parameters. A [`Predicate`] conjoins
//! them over an always-true base and is rendered into both the SELECT and the
//! COUNT statement by [`QueryBuilder`], so listing and counting share a single
//! WHERE clause.
//!
//! ## Key Components
//!
//! - [`builder`] - Predicate and SELECT/COUNT statement generation
//! - [`columns`] - The closed column set
//! - [`conditions`] - WHERE conditions and the [`SqlSink`] rendering target
//! - [`pagination`] - LIMIT/OFFSET bounds and pagination metadata
//! - [`sort`] - ORDER BY allowlist
//!
//! ## Injection Safety
//!
//! Every value is bound as a parameter. Identifiers (columns, sort keys) only
//! come from enums; the sort column in particular cannot be parameterized, so
//! [`SortColumn`] is the only path by which a caller influences ORDER BY.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use jobtrack_core::query_builder::{
//!     Column, Condition, Pagination, Predicate, QueryBuilder, Sort, SortColumn,
//! };
//!
//! let query = QueryBuilder::new("applications")
//!     .filter(Predicate::new().and(Condition::equals(Column::Status, "applied")))
//!     .order_by(Sort::asc(SortColumn::Company))
//!     .paginate(Pagination::new(20, 0));
//! let rows: Vec<Application> = query.fetch_all(&pool).await?;
//! let total = query.count(&pool).await?;
//! ```

pub mod builder;
pub mod columns;
pub mod conditions;
pub mod pagination;
pub mod sort;

pub use builder::{Predicate, QueryBuilder};
pub use columns::Column;
pub use conditions::{fold_case, Condition, RenderedSql, SqlSink, SqlValue};
pub use pagination::{Pagination, PaginationMeta};
pub use sort::{Sort, SortColumn, SortDirection};
