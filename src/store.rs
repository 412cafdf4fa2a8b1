//! # Application Store
//!
//! The operation surface consumed by request handlers and other
//! collaborators. [`ApplicationStore`] owns the database pool, validates
//! requests, runs every operation under the caller's [`OperationContext`],
//! and emits one structured log event per operation.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use jobtrack_core::config::TrackerConfig;
//! use jobtrack_core::context::OperationContext;
//! use jobtrack_core::models::{ApplicationChanges, ApplicationFilter, ListQuery, NewApplication};
//! use jobtrack_core::store::{ApplicationRepository, ApplicationStore};
//! use jobtrack_core::constants::ApplicationStatus;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ApplicationStore::open(&TrackerConfig::default()).await?;
//! let ctx = OperationContext::background();
//!
//! let created = store.create(&ctx, NewApplication::new("Acme", "Engineer")).await?;
//! let changes = ApplicationChanges {
//!     status: Some(ApplicationStatus::Applied),
//!     ..ApplicationChanges::default()
//! };
//! store.update(&ctx, &created.id, changes).await?;
//!
//! let filter = ApplicationFilter::new().with_status(ApplicationStatus::Applied);
//! let page = store.list(&ctx, &ListQuery::new(filter.clone()).paginate(20, 0)).await?;
//! let total = store.count(&ctx, &filter).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{QueryConfig, TrackerConfig};
use crate::context::OperationContext;
use crate::database::DatabaseConnection;
use crate::error::{Result, TrackerError};
use crate::logging::{log_error, log_store_operation};
use crate::models::{
    Application, ApplicationChanges, ApplicationFilter, ApplicationStats, ListQuery,
    NewApplication,
};
use crate::query_builder::{Pagination, PaginationMeta};
use crate::utils::timestamps;
use crate::validation::{validate_changes, validate_new_application};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Instant;
use tracing::instrument;

/// One page of applications with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedApplications {
    pub data: Vec<Application>,
    pub pagination: PaginationMeta,
}

/// Operations on the application store.
///
/// Absence is not an error: `get` and `update` return `Ok(None)` and
/// `delete` returns `Ok(false)` for an unknown id.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// One ordered page of matching applications
    async fn list(&self, ctx: &OperationContext, query: &ListQuery) -> Result<Vec<Application>>;

    /// Total matching applications, ignoring pagination
    async fn count(&self, ctx: &OperationContext, filter: &ApplicationFilter) -> Result<i64>;

    /// Atomic partial update.
    ///
    /// The context governs every step up to `COMMIT`; firing it earlier
    /// rolls the update back and returns `Cancelled` or `DeadlineExceeded`.
    /// The commit itself is not interrupted: once issued it either succeeds
    /// or fails as `TransactionFailure` at the commit stage.
    async fn update(
        &self,
        ctx: &OperationContext,
        id: &str,
        changes: ApplicationChanges,
    ) -> Result<Option<Application>>;

    async fn stats(&self, ctx: &OperationContext) -> Result<ApplicationStats>;

    async fn create(
        &self,
        ctx: &OperationContext,
        new_application: NewApplication,
    ) -> Result<Application>;

    async fn get(&self, ctx: &OperationContext, id: &str) -> Result<Option<Application>>;

    async fn delete(&self, ctx: &OperationContext, id: &str) -> Result<bool>;

    /// `list` and `count` over the same filter, with `has_more`
    async fn list_page(
        &self,
        ctx: &OperationContext,
        query: &ListQuery,
    ) -> Result<PaginatedApplications>;

    async fn health_check(&self, ctx: &OperationContext) -> Result<bool>;
}

/// SQLite-backed [`ApplicationRepository`].
pub struct ApplicationStore {
    db: DatabaseConnection,
    query_config: QueryConfig,
}

impl ApplicationStore {
    /// Open (creating if needed) the configured database.
    pub async fn open(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;
        let db = DatabaseConnection::connect(&config.database).await?;
        Ok(Self::new(db, config.query))
    }

    pub fn new(db: DatabaseConnection, query_config: QueryConfig) -> Self {
        Self { db, query_config }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn query_config(&self) -> &QueryConfig {
        &self.query_config
    }

    /// A listing query for `filter` using the configured default page size.
    pub fn list_query(&self, filter: ApplicationFilter) -> ListQuery {
        ListQuery {
            pagination: Pagination::new(self.query_config.default_limit, 0),
            ..ListQuery::new(filter)
        }
    }

    /// Statistics with activity windows measured back from `now`.
    #[instrument(skip(self, ctx))]
    pub async fn stats_at(
        &self,
        ctx: &OperationContext,
        now: DateTime<Utc>,
    ) -> Result<ApplicationStats> {
        let started = Instant::now();
        let result = ctx.run(ApplicationStats::compute(self.pool(), now)).await;
        record("stats", None, started, &result, |stats| {
            format!("total={}", stats.total)
        });
        result
    }

    pub async fn close(self) {
        self.db.close().await;
    }

    fn validate_pagination(&self, query: &ListQuery) -> Result<()> {
        query.pagination.validate(self.query_config.max_limit)
    }
}

/// Emit the per-operation log event for `result`.
fn record<T>(
    operation: &str,
    record_id: Option<&str>,
    started: Instant,
    result: &Result<T>,
    details: impl FnOnce(&T) -> String,
) {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).ok();
    match result {
        Ok(value) => log_store_operation(
            operation,
            record_id,
            "success",
            duration_ms,
            Some(&details(value)),
        ),
        Err(error) if error.is_cancellation() => {
            log_store_operation(operation, record_id, error.kind(), duration_ms, None)
        }
        Err(error) => log_error("application_store", operation, &error.to_string(), record_id),
    }
}

#[async_trait]
impl ApplicationRepository for ApplicationStore {
    #[instrument(skip(self, ctx))]
    async fn list(&self, ctx: &OperationContext, query: &ListQuery) -> Result<Vec<Application>> {
        let started = Instant::now();
        let result = async {
            self.validate_pagination(query)?;
            ctx.run(async {
                Application::list(self.pool(), query)
                    .await
                    .map_err(TrackerError::storage("list"))
            })
            .await
        }
        .await;
        record("list", None, started, &result, |rows| {
            format!("returned={}", rows.len())
        });
        result
    }

    #[instrument(skip(self, ctx))]
    async fn count(&self, ctx: &OperationContext, filter: &ApplicationFilter) -> Result<i64> {
        let started = Instant::now();
        let result = ctx
            .run(async {
                Application::count(self.pool(), filter)
                    .await
                    .map_err(TrackerError::storage("count"))
            })
            .await;
        record("count", None, started, &result, |total| {
            format!("total={total}")
        });
        result
    }

    #[instrument(skip(self, ctx))]
    async fn update(
        &self,
        ctx: &OperationContext,
        id: &str,
        changes: ApplicationChanges,
    ) -> Result<Option<Application>> {
        let started = Instant::now();
        let result = async {
            validate_changes(&changes)?;
            let staged = ctx
                .run(Application::stage_update(self.pool(), id, &changes))
                .await?;
            match staged {
                Some(staged) => staged.commit().await.map(Some),
                None => Ok(None),
            }
        }
        .await;
        record("update", Some(id), started, &result, |updated| {
            match updated {
                Some(_) => format!("fields={}", changes.assignments().len()),
                None => "not_found".to_string(),
            }
        });
        result
    }

    #[instrument(skip(self, ctx))]
    async fn stats(&self, ctx: &OperationContext) -> Result<ApplicationStats> {
        self.stats_at(ctx, timestamps::now()).await
    }

    #[instrument(skip(self, ctx))]
    async fn create(
        &self,
        ctx: &OperationContext,
        new_application: NewApplication,
    ) -> Result<Application> {
        let started = Instant::now();
        let result = async {
            validate_new_application(&new_application)?;
            ctx.run(async {
                Application::create(self.pool(), new_application)
                    .await
                    .map_err(TrackerError::storage("create"))
            })
            .await
        }
        .await;
        let record_id = result.as_ref().ok().map(|created| created.id.clone());
        record("create", record_id.as_deref(), started, &result, |created| {
            format!("status={}", created.status)
        });
        result
    }

    #[instrument(skip(self, ctx))]
    async fn get(&self, ctx: &OperationContext, id: &str) -> Result<Option<Application>> {
        let started = Instant::now();
        let result = ctx
            .run(async {
                Application::find_by_id(self.pool(), id)
                    .await
                    .map_err(TrackerError::storage("get"))
            })
            .await;
        record("get", Some(id), started, &result, |found| {
            let outcome = if found.is_some() { "found" } else { "not_found" };
            outcome.to_string()
        });
        result
    }

    #[instrument(skip(self, ctx))]
    async fn delete(&self, ctx: &OperationContext, id: &str) -> Result<bool> {
        let started = Instant::now();
        let result = ctx
            .run(async {
                Application::delete(self.pool(), id)
                    .await
                    .map_err(TrackerError::storage("delete"))
            })
            .await;
        record("delete", Some(id), started, &result, |deleted| {
            format!("deleted={deleted}")
        });
        result
    }

    #[instrument(skip(self, ctx))]
    async fn list_page(
        &self,
        ctx: &OperationContext,
        query: &ListQuery,
    ) -> Result<PaginatedApplications> {
        let started = Instant::now();
        let result = async {
            self.validate_pagination(query)?;
            ctx.run(async {
                let (data, total) = futures::try_join!(
                    async {
                        Application::list(self.pool(), query)
                            .await
                            .map_err(TrackerError::storage("list_page.list"))
                    },
                    async {
                        Application::count(self.pool(), &query.filter)
                            .await
                            .map_err(TrackerError::storage("list_page.count"))
                    },
                )?;
                let pagination = PaginationMeta::new(query.pagination, data.len(), total);
                Ok(PaginatedApplications { data, pagination })
            })
            .await
        }
        .await;
        record("list_page", None, started, &result, |page| {
            format!(
                "returned={} total={}",
                page.data.len(),
                page.pagination.total
            )
        });
        result
    }

    #[instrument(skip(self, ctx))]
    async fn health_check(&self, ctx: &OperationContext) -> Result<bool> {
        ctx.run(async {
            self.db
                .health_check()
                .await
                .map_err(TrackerError::storage("health_check"))
        })
        .await
    }
}
