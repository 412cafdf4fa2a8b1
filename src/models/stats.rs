//! # Application Statistics
//!
//! Computed summary of the whole store; never persisted.
//!
//! Three independent read queries feed the summary:
//! - status breakdown (`GROUP BY status`) and grand total
//! - salary range over rows with a specified lower bound (`salary_min > 0`)
//! - recent activity, counting rows created within the last 7 and 30 days
//!
//! The queries run concurrently and are not taken from one snapshot, so a
//! write landing between them can make the sections disagree slightly.

use crate::constants::{activity, ApplicationStatus, APPLICATIONS_TABLE};
use crate::error::{Result, TrackerError};
use crate::utils::timestamps::format_timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::collections::BTreeMap;
use tracing::warn;

/// Salary figures over rows with `salary_min > 0`; all zero when none qualify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SalaryRange {
    /// Smallest `salary_min`
    pub min: i64,
    /// Largest `salary_max` among the same rows
    pub max: i64,
    /// Mean `salary_min`, truncated
    pub avg: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecentActivity {
    pub last_7_days: i64,
    pub last_30_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationStats {
    /// Every status is present, zero when unused
    pub by_status: BTreeMap<ApplicationStatus, i64>,
    pub total: i64,
    pub salary_range: SalaryRange,
    pub recent_activity: RecentActivity,
}

impl Default for ApplicationStats {
    fn default() -> Self {
        Self {
            by_status: empty_breakdown(),
            total: 0,
            salary_range: SalaryRange::default(),
            recent_activity: RecentActivity::default(),
        }
    }
}

fn empty_breakdown() -> BTreeMap<ApplicationStatus, i64> {
    ApplicationStatus::ALL.iter().map(|s| (*s, 0)).collect()
}

/// Status counts plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub by_status: BTreeMap<ApplicationStatus, i64>,
    pub total: i64,
}

impl StatusBreakdown {
    /// Fold raw `(status, count)` rows. Unknown statuses count toward the
    /// total only.
    pub fn from_rows(rows: impl IntoIterator<Item = (String, i64)>) -> Self {
        let mut by_status = empty_breakdown();
        let mut total = 0;

        for (raw, count) in rows {
            total += count;
            match raw.parse::<ApplicationStatus>() {
                Ok(status) => *by_status.entry(status).or_insert(0) += count,
                Err(_) => warn!(
                    status = %raw,
                    count = count,
                    "Stored application status is not recognised; counted in total only"
                ),
            }
        }

        Self { by_status, total }
    }
}

pub async fn status_breakdown(pool: &SqlitePool) -> std::result::Result<StatusBreakdown, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(&format!(
        "SELECT status, COUNT(*) FROM {APPLICATIONS_TABLE} GROUP BY status"
    ))
    .fetch_all(pool)
    .await?;

    Ok(StatusBreakdown::from_rows(rows))
}

pub async fn salary_range(pool: &SqlitePool) -> std::result::Result<SalaryRange, sqlx::Error> {
    sqlx::query_as::<_, SalaryRange>(&format!(
        r#"
        SELECT
            COALESCE(MIN(salary_min), 0) AS min,
            COALESCE(MAX(salary_max), 0) AS max,
            COALESCE(CAST(AVG(salary_min) AS INTEGER), 0) AS avg
        FROM {APPLICATIONS_TABLE}
        WHERE salary_min > 0
        "#
    ))
    .fetch_one(pool)
    .await
}

/// Both windows are inclusive: a row created exactly N days before `now`
/// is counted.
pub async fn recent_activity(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> std::result::Result<RecentActivity, sqlx::Error> {
    let short_start = now - Duration::days(activity::SHORT_WINDOW_DAYS);
    let long_start = now - Duration::days(activity::LONG_WINDOW_DAYS);

    sqlx::query_as::<_, RecentActivity>(&format!(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END), 0) AS last_7_days,
            COALESCE(SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END), 0) AS last_30_days
        FROM {APPLICATIONS_TABLE}
        "#
    ))
    .bind(format_timestamp(&short_start))
    .bind(format_timestamp(&long_start))
    .fetch_one(pool)
    .await
}

impl ApplicationStats {
    /// Run the three aggregate queries concurrently, measuring activity
    /// windows back from `now`.
    pub async fn compute(pool: &SqlitePool, now: DateTime<Utc>) -> Result<ApplicationStats> {
        let (breakdown, salary_range, recent_activity) = futures::try_join!(
            async {
                status_breakdown(pool)
                    .await
                    .map_err(TrackerError::storage("stats.status_breakdown"))
            },
            async {
                salary_range(pool)
                    .await
                    .map_err(TrackerError::storage("stats.salary_range"))
            },
            async {
                recent_activity(pool, now)
                    .await
                    .map_err(TrackerError::storage("stats.recent_activity"))
            },
        )?;

        Ok(ApplicationStats {
            by_status: breakdown.by_status,
            total: breakdown.total,
            salary_range,
            recent_activity,
        })
    }
}
