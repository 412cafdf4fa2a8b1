//! # Schema Bootstrap
//!
//! The store has a single table and no versioned migrations: every statement
//! is idempotent (`IF NOT EXISTS`) and runs each time a database is opened.
//!
//! `company_key`, `role_key` and `location_key` hold the case-folded text
//! that substring filters match against. A database created without them has
//! the columns added and back-filled on open.

use crate::query_builder::{fold_case, Column};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

const SEARCH_KEYS: [(Column, Column); 3] = [
    (Column::Company, Column::CompanyKey),
    (Column::Role, Column::RoleKey),
    (Column::Location, Column::LocationKey),
];

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id          TEXT PRIMARY KEY,
        company     TEXT NOT NULL,
        role        TEXT NOT NULL,
        url         TEXT NOT NULL DEFAULT '',
        salary_min  INTEGER NOT NULL DEFAULT 0,
        salary_max  INTEGER NOT NULL DEFAULT 0,
        location    TEXT NOT NULL DEFAULT '',
        status      TEXT NOT NULL DEFAULT 'wishlist',
        notes       TEXT NOT NULL DEFAULT '',
        applied_at  TEXT NOT NULL DEFAULT '',
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL,
        company_key  TEXT NOT NULL DEFAULT '',
        role_key     TEXT NOT NULL DEFAULT '',
        location_key TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status)",
    "CREATE INDEX IF NOT EXISTS idx_applications_created_at ON applications(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_applications_updated_at ON applications(updated_at)",
];

pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Create the table and indexes if absent, then add any missing search
    /// key columns
    pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        Self::ensure_search_keys(&mut tx).await?;
        tx.commit().await?;

        debug!(statements = SCHEMA.len(), "Schema is up to date");
        Ok(())
    }

    async fn ensure_search_keys(
        tx: &mut Transaction<'static, Sqlite>,
    ) -> Result<(), sqlx::Error> {
        let existing: Vec<String> =
            sqlx::query("SELECT name FROM pragma_table_info('applications')")
                .fetch_all(&mut **tx)
                .await?
                .iter()
                .map(|row| row.try_get("name"))
                .collect::<Result<_, _>>()?;

        let mut added = 0;
        for (_, key) in SEARCH_KEYS {
            if !existing.iter().any(|name| name == key.as_str()) {
                sqlx::query(&format!(
                    "ALTER TABLE applications ADD COLUMN {key} TEXT NOT NULL DEFAULT ''"
                ))
                .execute(&mut **tx)
                .await?;
                added += 1;
            }
        }
        if added == 0 {
            return Ok(());
        }

        let rows = sqlx::query("SELECT id, company, role, location FROM applications")
            .fetch_all(&mut **tx)
            .await?;
        for row in &rows {
            let id: String = row.try_get("id")?;
            let mut statement = sqlx::QueryBuilder::<Sqlite>::new("UPDATE applications SET ");
            for (index, (source, key)) in SEARCH_KEYS.iter().enumerate() {
                if index > 0 {
                    statement.push(", ");
                }
                let value: Option<String> = row.try_get(source.as_str())?;
                statement.push(format!("{key} = "));
                statement.push_bind(fold_case(&value.unwrap_or_default()));
            }
            statement.push(" WHERE id = ");
            statement.push_bind(id);
            statement.build().execute(&mut **tx).await?;
        }

        info!(columns = added, rows = rows.len(), "Back-filled search key columns");
        Ok(())
    }
}
