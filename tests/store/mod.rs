//! Store Operation Tests

pub mod cancellation;
pub mod list_count;
pub mod update;
