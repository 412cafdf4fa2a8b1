//! # Listing Queries
//!
//! Filter, sort and pagination values for application listings, and their
//! translation into the shared [`Predicate`].

use crate::constants::{ApplicationStatus, APPLICATIONS_TABLE};
use crate::query_builder::{Column, Condition, Pagination, Predicate, QueryBuilder, Sort};
use crate::utils::timestamps::{ceil_to_stored_precision, format_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which applications to match. Every field is independent; `None` means
/// "do not filter on this dimension".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationFilter {
    /// Exact status match
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring of `company`
    pub company: Option<String>,
    /// Case-insensitive substring of `role`
    pub role: Option<String>,
    /// Case-insensitive substring of `location`
    pub location: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    pub created_before: Option<DateTime<Utc>>,
    /// Inclusive lower bound on `salary_min`
    pub salary_min_at_least: Option<i64>,
    /// Inclusive upper bound on `salary_max`. Rows whose `salary_max` is the
    /// unspecified sentinel (0) never match, so `Some(0)` matches nothing.
    pub salary_max_at_most: Option<i64>,
}

impl ApplicationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn created_after(mut self, after: DateTime<Utc>) -> Self {
        self.created_after = Some(after);
        self
    }

    pub fn created_before(mut self, before: DateTime<Utc>) -> Self {
        self.created_before = Some(before);
        self
    }

    pub fn salary_min_at_least(mut self, amount: i64) -> Self {
        self.salary_min_at_least = Some(amount);
        self
    }

    pub fn salary_max_at_most(mut self, amount: i64) -> Self {
        self.salary_max_at_most = Some(amount);
        self
    }

    /// Translate into the predicate shared by list and count. Conditions are
    /// conjoined in a fixed field order.
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate::new();

        if let Some(status) = self.status {
            predicate.push(Condition::equals(Column::Status, status.as_str()));
        }
        if let Some(company) = &self.company {
            predicate.push(Condition::contains_ignore_case(Column::Company, company));
        }
        if let Some(role) = &self.role {
            predicate.push(Condition::contains_ignore_case(Column::Role, role));
        }
        if let Some(location) = &self.location {
            predicate.push(Condition::contains_ignore_case(Column::Location, location));
        }
        if let Some(after) = &self.created_after {
            predicate.push(Condition::at_least(
                Column::CreatedAt,
                format_timestamp(&ceil_to_stored_precision(after)),
            ));
        }
        if let Some(before) = &self.created_before {
            predicate.push(Condition::at_most(
                Column::CreatedAt,
                format_timestamp(before),
            ));
        }
        if let Some(amount) = self.salary_min_at_least {
            predicate.push(Condition::at_least(Column::SalaryMin, amount));
        }
        if let Some(amount) = self.salary_max_at_most {
            predicate.push(Condition::Positive {
                column: Column::SalaryMax,
            });
            predicate.push(Condition::at_most(Column::SalaryMax, amount));
        }

        predicate
    }
}

/// A filter plus ordering and page selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub filter: ApplicationFilter,
    /// `None` orders by most recently updated first
    pub sort: Option<Sort>,
    pub pagination: Pagination,
}

impl ListQuery {
    pub fn new(filter: ApplicationFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.pagination = Pagination::new(limit, offset);
        self
    }

    pub fn resolved_sort(&self) -> Sort {
        self.sort.unwrap_or_default()
    }

    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(APPLICATIONS_TABLE)
            .filter(self.filter.predicate())
            .order_by(self.resolved_sort())
            .paginate(self.pagination)
    }
}
