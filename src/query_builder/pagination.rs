use crate::constants::pagination::DEFAULT_LIMIT;
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};

/// Page size and offset for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Create pagination with page number (1-indexed) and per-page count
    pub fn page(page: u32, per_page: u32) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        Self {
            limit: per_page,
            offset,
        }
    }

    /// Reject, never clamp, a limit outside `[1, max_limit]`.
    pub fn validate(&self, max_limit: u32) -> Result<()> {
        if self.limit < 1 || self.limit > max_limit {
            return Err(TrackerError::validation(format!(
                "limit must be between 1 and {max_limit} (got {})",
                self.limit
            )));
        }
        Ok(())
    }

    /// Whether rows remain past this page, given how many it returned.
    pub fn has_more(&self, returned: usize, total: i64) -> bool {
        (self.offset as i64) + (returned as i64) < total
    }

    /// Calculate total pages given a total count
    pub fn total_pages(&self, total_count: i64) -> i64 {
        if self.limit == 0 {
            return 0;
        }
        let limit = self.limit as i64;
        (total_count + limit - 1) / limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Pagination block returned alongside a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, returned: usize, total: i64) -> Self {
        Self {
            total,
            limit: pagination.limit,
            offset: pagination.offset,
            has_more: pagination.has_more(returned, total),
        }
    }
}
