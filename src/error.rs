//! # Error Types
//!
//! Structured errors for the tracker core. "Absent" outcomes (unknown id) are
//! not errors: they surface as `Ok(None)` / `Ok(false)` from the store.

use std::fmt;
use thiserror::Error;

/// Stage of a transaction at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStage {
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for TransactionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStage::Begin => write!(f, "begin"),
            TransactionStage::Commit => write!(f, "commit"),
            TransactionStage::Rollback => write!(f, "rollback"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The request violates the sort allowlist, pagination bounds or a
    /// request-level rule. Never clamped or defaulted.
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    /// Begin/commit/rollback failed. A commit failure means durability of
    /// the write is unknown.
    #[error("Transaction {stage} failed: {source}")]
    TransactionFailure {
        stage: TransactionStage,
        #[source]
        source: sqlx::Error,
    },

    /// The storage engine rejected or failed a statement.
    #[error("Storage failure during {operation}: {source}")]
    StorageFailure {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation deadline exceeded")]
    DeadlineExceeded,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TrackerError {
    /// `map_err` adapter wrapping a `sqlx::Error` with the failing operation.
    pub fn storage(operation: &'static str) -> impl FnOnce(sqlx::Error) -> TrackerError {
        move |source| TrackerError::StorageFailure { operation, source }
    }

    /// `map_err` adapter for transaction control statements.
    pub fn transaction(stage: TransactionStage) -> impl FnOnce(sqlx::Error) -> TrackerError {
        move |source| TrackerError::TransactionFailure { stage, source }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        TrackerError::ValidationRejected(message.into())
    }

    /// True for the two cancellation outcomes.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, TrackerError::Cancelled | TrackerError::DeadlineExceeded)
    }

    /// Short machine-readable label, used as the `status` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::ValidationRejected(_) => "validation_rejected",
            TrackerError::TransactionFailure { .. } => "transaction_failure",
            TrackerError::StorageFailure { .. } => "storage_failure",
            TrackerError::Cancelled => "cancelled",
            TrackerError::DeadlineExceeded => "deadline_exceeded",
            TrackerError::Configuration(_) => "configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
