//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQLite query details from admission orchestration.
//!
//! # Invariants
//! - Repositories never decide business rules; they persist and query.
//! - Write paths return the record as read back from the store.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod attendee_repo;
pub mod error;
pub mod event_repo;
pub mod lookup;
pub mod schedule_repo;
pub mod session_repo;
pub mod track_repo;

use crate::config::PaginationConfig;
use uuid::Uuid;

pub use error::{RepoError, RepoResult};

/// Caller-facing list options. `limit` is normalized before it reaches SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListQuery {
    /// Resolves page bounds against the configured pagination limits.
    pub fn resolve(&self, pagination: &PaginationConfig) -> Page {
        Page {
            limit: pagination.normalize_limit(self.limit),
            offset: self.offset,
        }
    }
}

/// Normalized `LIMIT`/`OFFSET` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
