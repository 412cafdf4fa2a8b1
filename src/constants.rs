//! # System Constants
//!
//! Core constants and enums that define the operational boundaries of the
//! tracker: the status enumeration, the table name and pagination limits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table holding every tracked application.
pub const APPLICATIONS_TABLE: &str = "applications";

/// Pagination defaults and bounds
pub mod pagination {
    /// Page size used when the caller does not ask for one
    pub const DEFAULT_LIMIT: u32 = 50;

    /// Largest page size the store will serve
    pub const MAX_LIMIT: u32 = 500;
}

/// Trailing windows reported by the recent-activity stats, in days
pub mod activity {
    pub const SHORT_WINDOW_DAYS: i64 = 7;
    pub const LONG_WINDOW_DAYS: i64 = 30;
}

/// Lifecycle status of a job application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Wishlist,
    Applied,
    PhoneScreen,
    Interview,
    Offer,
    Accepted,
    Rejected,
    Withdrawn,
    Ghosted,
}

impl ApplicationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [ApplicationStatus; 9] = [
        ApplicationStatus::Wishlist,
        ApplicationStatus::Applied,
        ApplicationStatus::PhoneScreen,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
        ApplicationStatus::Ghosted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Wishlist => "wishlist",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::PhoneScreen => "phone_screen",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
            ApplicationStatus::Ghosted => "ghosted",
        }
    }

    /// Comma separated list of valid values, for error messages.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(ApplicationStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string is not one of the nine known statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status {value:?}, valid values: {valid}", valid = ApplicationStatus::valid_values())]
pub struct InvalidStatus {
    pub value: String,
}

impl FromStr for ApplicationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus {
                value: s.to_string(),
            })
    }
}
