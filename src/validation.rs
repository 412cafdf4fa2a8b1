//! Input validation for application requests
//!
//! Checks applied by the store facade before any statement runs. Status
//! values need no check here: they are parsed into [`ApplicationStatus`]
//! during deserialization.
//!
//! [`ApplicationStatus`]: crate::constants::ApplicationStatus

use crate::error::{Result, TrackerError};
use crate::models::{ApplicationChanges, NewApplication};

/// Length of a generated application id
pub const APPLICATION_ID_LENGTH: usize = 8;

/// Validates a create request. Company and role must be non-empty; text is
/// stored as supplied, so whitespace counts as a value.
pub fn validate_new_application(new_application: &NewApplication) -> Result<()> {
    if new_application.company.is_empty() {
        return Err(TrackerError::validation("company is required"));
    }

    if new_application.role.is_empty() {
        return Err(TrackerError::validation("role is required"));
    }

    validate_salary_order(new_application.salary_min, new_application.salary_max)
}

/// Validates a partial update change set
pub fn validate_changes(changes: &ApplicationChanges) -> Result<()> {
    validate_salary_order(changes.salary_min, changes.salary_max)
}

/// Only checked when both bounds are supplied; either side may be the
/// unspecified sentinel otherwise.
fn validate_salary_order(salary_min: Option<i64>, salary_max: Option<i64>) -> Result<()> {
    match (salary_min, salary_max) {
        (Some(min), Some(max)) if min > max => Err(TrackerError::validation(format!(
            "salary_min cannot be greater than salary_max ({min} > {max})"
        ))),
        _ => Ok(()),
    }
}

/// Whether `id` has the shape of a generated id: 8 lowercase hex digits.
pub fn is_valid_application_id(id: &str) -> bool {
    id.len() == APPLICATION_ID_LENGTH
        && id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
