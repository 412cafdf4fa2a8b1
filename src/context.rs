//! # Operation Context
//!
//! Caller-supplied cancellation and deadline for a single store operation.
//!
//! Every store method takes an [`OperationContext`] and races its work
//! against it. When the token is cancelled or the deadline passes, the
//! in-flight future is dropped: pending statements are abandoned and an open
//! transaction is rolled back when it goes out of scope.

use crate::error::{Result, TrackerError};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// Never cancelled, no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Share an existing token, e.g. a child of a request-scoped token.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Add or tighten the deadline.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    /// Fail fast if the context is already cancelled or expired.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(TrackerError::Cancelled);
        }
        if self.is_expired() {
            return Err(TrackerError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `operation` to completion unless the context fires first.
    pub async fn run<F, T>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let expiry = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(TrackerError::Cancelled),
            _ = expiry => Err(TrackerError::DeadlineExceeded),
            outcome = operation => outcome,
        }
    }
}
