//! # Application Model
//!
//! The single tracked record: one job application.
//!
//! ## Database Schema
//!
//! Maps to the `applications` table:
//! - `id`: 8 lowercase hex characters (TEXT PRIMARY KEY)
//! - `company`, `role`: required text
//! - `url`, `location`, `notes`, `applied_at`: optional text, `''` when unset
//! - `salary_min`, `salary_max`: INTEGER, `0` means unspecified
//! - `status`: one of [`ApplicationStatus`], default `wishlist`
//! - `created_at`, `updated_at`: fixed-width RFC 3339 UTC text
//! - `company_key`, `role_key`, `location_key`: case-folded copies used by
//!   substring filters, written alongside their source columns
//!
//! ## Operations
//!
//! Simple single-statement reads and writes (`create`, `find_by_id`, `list`,
//! `count`, `delete`) are generic over any SQLite executor. `update` runs the
//! read-merge-write protocol inside one write transaction, and is split into
//! `stage_update` and [`StagedUpdate::commit`] for callers that must not
//! abandon a commit once it has been issued.

use crate::constants::{ApplicationStatus, APPLICATIONS_TABLE};
use crate::error::{Result, TrackerError, TransactionStage};
use crate::models::filter::{ApplicationFilter, ListQuery};
use crate::query_builder::{fold_case, Column, QueryBuilder, SqlSink, SqlValue};
use crate::utils::serde::deserialize_optional_amount;
use crate::utils::timestamps::{self, format_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder as SqlxQueryBuilder, Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// A tracked job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub company: String,
    pub role: String,
    pub url: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub location: String,
    pub status: ApplicationStatus,
    pub notes: String,
    pub applied_at: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New Application for creation (without generated fields)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub url: String,
    #[serde(deserialize_with = "deserialize_optional_amount")]
    pub salary_min: Option<i64>,
    #[serde(deserialize_with = "deserialize_optional_amount")]
    pub salary_max: Option<i64>,
    pub location: String,
    /// Defaults to `wishlist`
    pub status: Option<ApplicationStatus>,
    pub notes: String,
    pub applied_at: String,
}

impl NewApplication {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            ..Self::default()
        }
    }
}

/// Sparse change set for a partial update: one optional slot per mutable
/// attribute. `Some("")` and `Some(0)` are real changes; only `None` leaves a
/// column untouched. Unknown keys in a JSON payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        deserialize_with = "deserialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_min: Option<i64>,
    #[serde(
        deserialize_with = "deserialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<String>,
}

impl ApplicationChanges {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Column assignments for the supplied slots, in table column order.
    pub fn assignments(&self) -> Vec<(Column, SqlValue)> {
        let text = |column: Column, value: &Option<String>| {
            value
                .as_ref()
                .map(|v| (column, SqlValue::Text(v.clone())))
        };
        let integer =
            |column: Column, value: Option<i64>| value.map(|v| (column, SqlValue::Integer(v)));

        [
            text(Column::Company, &self.company),
            text(Column::Role, &self.role),
            text(Column::Url, &self.url),
            integer(Column::SalaryMin, self.salary_min),
            integer(Column::SalaryMax, self.salary_max),
            text(Column::Location, &self.location),
            self.status
                .map(|status| (Column::Status, SqlValue::from(status.as_str()))),
            text(Column::Notes, &self.notes),
            text(Column::AppliedAt, &self.applied_at),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Application {
    fn from_row(row: &'r SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            company: row.try_get("company")?,
            role: row.try_get("role")?,
            url: optional_text(row, "url")?,
            salary_min: optional_amount(row, "salary_min")?,
            salary_max: optional_amount(row, "salary_max")?,
            location: optional_text(row, "location")?,
            status: decode_status(row)?,
            notes: optional_text(row, "notes")?,
            applied_at: optional_text(row, "applied_at")?,
            created_at: decode_timestamp(row, "created_at")?,
            updated_at: decode_timestamp(row, "updated_at")?,
        })
    }
}

fn optional_text(row: &SqliteRow, column: &str) -> std::result::Result<String, sqlx::Error> {
    Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
}

fn optional_amount(row: &SqliteRow, column: &str) -> std::result::Result<i64, sqlx::Error> {
    Ok(row.try_get::<Option<i64>, _>(column)?.unwrap_or_default())
}

fn decode_status(row: &SqliteRow) -> std::result::Result<ApplicationStatus, sqlx::Error> {
    let raw: String = row.try_get("status")?;
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

fn decode_timestamp(
    row: &SqliteRow,
    column: &str,
) -> std::result::Result<DateTime<Utc>, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    parse_timestamp(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// First 8 hex digits of a random v4 UUID.
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

fn select_by_id_sql() -> String {
    format!(
        "SELECT {} FROM {APPLICATIONS_TABLE} WHERE id = ?",
        Column::select_list()
    )
}

/// `UPDATE applications SET <col> = ?, ..., updated_at = ? WHERE id = ?`.
/// A searchable column is followed by its folded search key.
fn write_update(
    sink: &mut impl SqlSink,
    id: &str,
    assignments: Vec<(Column, SqlValue)>,
    updated_at: &DateTime<Utc>,
) {
    sink.push_sql(&format!("UPDATE {APPLICATIONS_TABLE} SET "));
    for (column, value) in assignments {
        let folded = match (column.search_key(), &value) {
            (Some(key), SqlValue::Text(text)) => Some((key, SqlValue::Text(fold_case(text)))),
            _ => None,
        };
        sink.push_sql(&format!("{column} = "));
        sink.push_value(value);
        sink.push_sql(", ");
        if let Some((key, folded)) = folded {
            sink.push_sql(&format!("{key} = "));
            sink.push_value(folded);
            sink.push_sql(", ");
        }
    }
    sink.push_sql(&format!("{} = ", Column::UpdatedAt));
    sink.push_value(SqlValue::Text(format_timestamp(updated_at)));
    sink.push_sql(&format!(" WHERE {} = ", Column::Id));
    sink.push_value(SqlValue::Text(id.to_string()));
}

impl Application {
    /// Insert a new application with a generated id and equal
    /// `created_at`/`updated_at`.
    pub async fn create<'e, E>(
        executor: E,
        new_application: NewApplication,
    ) -> std::result::Result<Application, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let now = format_timestamp(&timestamps::now());
        let company_key = fold_case(&new_application.company);
        let role_key = fold_case(&new_application.role);
        let location_key = fold_case(&new_application.location);
        let sql = format!(
            r#"
            INSERT INTO {APPLICATIONS_TABLE} (
                id, company, role, url, salary_min, salary_max, location,
                status, notes, applied_at, created_at, updated_at,
                company_key, role_key, location_key
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            Column::select_list()
        );

        sqlx::query_as::<_, Application>(&sql)
            .bind(generate_id())
            .bind(new_application.company)
            .bind(new_application.role)
            .bind(new_application.url)
            .bind(new_application.salary_min.unwrap_or(0))
            .bind(new_application.salary_max.unwrap_or(0))
            .bind(new_application.location)
            .bind(new_application.status.unwrap_or_default().as_str())
            .bind(new_application.notes)
            .bind(new_application.applied_at)
            .bind(&now)
            .bind(&now)
            .bind(company_key)
            .bind(role_key)
            .bind(location_key)
            .fetch_one(executor)
            .await
    }

    /// Find an application by ID
    pub async fn find_by_id<'e, E>(
        executor: E,
        id: &str,
    ) -> std::result::Result<Option<Application>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Application>(&select_by_id_sql())
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// One ordered page of applications matching the query's filter.
    pub async fn list<'e, E>(
        executor: E,
        query: &ListQuery,
    ) -> std::result::Result<Vec<Application>, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        query.query_builder().fetch_all(executor).await
    }

    /// Number of applications matching the filter, ignoring pagination.
    pub async fn count<'e, E>(
        executor: E,
        filter: &ApplicationFilter,
    ) -> std::result::Result<i64, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        QueryBuilder::new(APPLICATIONS_TABLE)
            .filter(filter.predicate())
            .count(executor)
            .await
    }

    /// Delete an application; `false` when no row had that id.
    pub async fn delete<'e, E>(executor: E, id: &str) -> std::result::Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(&format!("DELETE FROM {APPLICATIONS_TABLE} WHERE id = ?"))
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Partial update: read, merge and rewrite one application atomically.
    ///
    /// Returns `Ok(None)` when the id does not exist. An empty change set
    /// returns the current row untouched, `updated_at` included.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        changes: &ApplicationChanges,
    ) -> Result<Option<Application>> {
        match Self::stage_update(pool, id, changes).await? {
            Some(staged) => staged.commit().await.map(Some),
            None => Ok(None),
        }
    }

    /// Every step of [`Application::update`] short of `COMMIT`.
    ///
    /// The transaction is opened with `BEGIN IMMEDIATE` so the write lock is
    /// held from the initial read onwards; concurrent updates queue on the
    /// engine's busy timeout and each sees the previous one's result.
    /// Dropping the future, or the returned [`StagedUpdate`], rolls the
    /// transaction back.
    pub async fn stage_update(
        pool: &SqlitePool,
        id: &str,
        changes: &ApplicationChanges,
    ) -> Result<Option<StagedUpdate>> {
        let mut tx = pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(TrackerError::transaction(TransactionStage::Begin))?;

        let existing = Self::find_by_id(&mut *tx, id)
            .await
            .map_err(TrackerError::storage("update.read_existing"))?;

        let Some(existing) = existing else {
            tx.rollback()
                .await
                .map_err(TrackerError::transaction(TransactionStage::Rollback))?;
            return Ok(None);
        };

        let assignments = changes.assignments();
        if assignments.is_empty() {
            tx.rollback()
                .await
                .map_err(TrackerError::transaction(TransactionStage::Rollback))?;
            return Ok(Some(StagedUpdate {
                tx: None,
                application: existing,
            }));
        }

        let updated_at = timestamps::next_after(&existing.updated_at);
        let mut statement = SqlxQueryBuilder::<Sqlite>::new("");
        write_update(&mut statement, id, assignments, &updated_at);
        statement
            .build()
            .execute(&mut *tx)
            .await
            .map_err(TrackerError::storage("update.write"))?;

        let updated = Self::find_by_id(&mut *tx, id)
            .await
            .map_err(TrackerError::storage("update.read_updated"))?
            .ok_or_else(|| TrackerError::StorageFailure {
                operation: "update.read_updated",
                source: sqlx::Error::RowNotFound,
            })?;

        Ok(Some(StagedUpdate {
            tx: Some(tx),
            application: updated,
        }))
    }
}

/// A written but uncommitted update, holding the write lock until
/// [`StagedUpdate::commit`] or drop.
pub struct StagedUpdate {
    tx: Option<Transaction<'static, Sqlite>>,
    application: Application,
}

impl StagedUpdate {
    /// The row as it will read once committed.
    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Whether committing writes anything. `false` for an empty change set.
    pub fn is_write(&self) -> bool {
        self.tx.is_some()
    }

    pub async fn commit(self) -> Result<Application> {
        if let Some(tx) = self.tx {
            tx.commit()
                .await
                .map_err(TrackerError::transaction(TransactionStage::Commit))?;
        }
        Ok(self.application)
    }
}
