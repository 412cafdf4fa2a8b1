use super::Column;
use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Columns a listing may be ordered by. Anything else is rejected at parse
/// time, so only these names are ever interpolated into ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Company,
    Role,
    Status,
    Location,
    SalaryMin,
    SalaryMax,
    AppliedAt,
    CreatedAt,
    UpdatedAt,
}

impl SortColumn {
    pub const ALLOWED: [SortColumn; 9] = [
        SortColumn::Company,
        SortColumn::Role,
        SortColumn::Status,
        SortColumn::Location,
        SortColumn::SalaryMin,
        SortColumn::SalaryMax,
        SortColumn::AppliedAt,
        SortColumn::CreatedAt,
        SortColumn::UpdatedAt,
    ];

    pub fn column(&self) -> Column {
        match self {
            SortColumn::Company => Column::Company,
            SortColumn::Role => Column::Role,
            SortColumn::Status => Column::Status,
            SortColumn::Location => Column::Location,
            SortColumn::SalaryMin => Column::SalaryMin,
            SortColumn::SalaryMax => Column::SalaryMax,
            SortColumn::AppliedAt => Column::AppliedAt,
            SortColumn::CreatedAt => Column::CreatedAt,
            SortColumn::UpdatedAt => Column::UpdatedAt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.column().as_str()
    }
}

impl FromStr for SortColumn {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALLOWED
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| {
                let allowed = SortColumn::ALLOWED
                    .iter()
                    .map(SortColumn::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                TrackerError::validation(format!(
                    "invalid sort column {s:?}, allowed: {allowed}"
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(TrackerError::validation(format!(
                "invalid sort order {s:?}, expected asc or desc"
            )))
        }
    }
}

/// ORDER BY clause for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn asc(column: SortColumn) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: SortColumn) -> Self {
        Self::new(column, SortDirection::Desc)
    }

    /// Parse a raw column name and optional direction (defaults to DESC).
    pub fn parse(column: &str, direction: Option<&str>) -> Result<Self, TrackerError> {
        let column = column.parse()?;
        let direction = match direction {
            Some(raw) => raw.parse()?,
            None => SortDirection::Desc,
        };
        Ok(Self { column, direction })
    }

    /// `col DIR, id ASC`; the id tiebreak keeps pages stable when sort keys repeat.
    pub fn to_sql(&self) -> String {
        format!(
            "{} {}, {} ASC",
            self.column.as_str(),
            self.direction.as_sql(),
            Column::Id
        )
    }
}

impl Default for Sort {
    /// Most recently updated first.
    fn default() -> Self {
        Sort::desc(SortColumn::UpdatedAt)
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
