//! Admission validators.
//!
//! # Responsibility
//! - Decide whether a candidate event, track, session or attendee may be
//!   admitted given the records already stored.
//! - Report refusals as typed [`Rejection`] values.
//!
//! # Invariants
//! - Validators never write. All reads go through [`ScheduleLookup`], so the
//!   same rules run against the SQLite transaction and the unit-test fakes.
//! - Structural field checks run before any store lookup.
//! - Interval overlap is strict half-open: touching windows are admitted.

pub mod capacity;
pub mod sanitize;
pub mod shape;
pub mod temporal;

#[cfg(test)]
pub(crate) mod testing;

use crate::model::attendee::AttendeeId;
use crate::model::event::{Event, EventId};
use crate::model::interval::TimeWindow;
use crate::model::session::SessionId;
use crate::model::track::{Track, TrackId};
use crate::repo::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use capacity::{validate_attendee, validate_track};
pub use sanitize::sanitize_markup;
pub use temporal::{validate_event, validate_event_update, validate_session};

/// Classified reason an admission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// `end_at <= start_at`.
    InvalidInterval,
    /// Overlap with an existing event, or a session on the same track.
    TemporalConflict,
    /// Session outside its event, or track/event mismatch.
    ContainmentViolation,
    /// Event is full, or capacity would drop below the attendee count.
    CapacityExceeded,
    /// Duplicate `(event, email)` or duplicate track name.
    DuplicateUnique,
    /// Referenced record does not exist.
    NotFound,
    /// Store busy, locked or timed out. Safe to retry.
    TransientStoreError,
    /// Field shape violation.
    InvalidInput,
}

impl RejectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInterval => "invalid_interval",
            Self::TemporalConflict => "temporal_conflict",
            Self::ContainmentViolation => "containment_violation",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::DuplicateUnique => "duplicate_unique",
            Self::NotFound => "not_found",
            Self::TransientStoreError => "transient_store_error",
            Self::InvalidInput => "invalid_input",
        }
    }

    /// Only transient store failures may succeed on an identical retry.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TransientStoreError)
    }
}

impl Display for RejectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refusal returned by a validator or the admission pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    /// Human-readable context. Contains ids and field names only.
    pub detail: String,
}

impl Rejection {
    pub fn new(kind: RejectionKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::new(RejectionKind::InvalidInput, detail)
    }

    pub fn not_found(entity: &str, id: uuid::Uuid) -> Self {
        Self::new(RejectionKind::NotFound, format!("{entity} not found: {id}"))
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

impl Error for Rejection {}

/// Validator failure: either a decision or a failed lookup.
#[derive(Debug)]
pub enum ValidationError {
    Rejected(Rejection),
    Lookup(RepoError),
}

pub type ValidationResult<T = ()> = Result<T, ValidationError>;

impl ValidationError {
    /// Returns the rejection kind when this is a decision, not a lookup failure.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            Self::Rejected(rejection) => Some(rejection.kind),
            Self::Lookup(_) => None,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "rejected: {rejection}"),
            Self::Lookup(err) => write!(f, "validation lookup failed: {err}"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Lookup(err) => Some(err),
        }
    }
}

impl From<Rejection> for ValidationError {
    fn from(value: Rejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<RepoError> for ValidationError {
    fn from(value: RepoError) -> Self {
        Self::Lookup(value)
    }
}

/// Read-only view of stored scheduling state consumed by the validators.
pub trait ScheduleLookup {
    fn event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn track(&self, id: TrackId) -> RepoResult<Option<Track>>;
    /// Events intersecting `window`, ignoring `exclude`.
    fn overlapping_events(
        &self,
        window: TimeWindow,
        exclude: Option<EventId>,
    ) -> RepoResult<Vec<EventId>>;
    /// Sessions on `track` intersecting `window`, ignoring `exclude`.
    fn overlapping_sessions(
        &self,
        track: TrackId,
        window: TimeWindow,
        exclude: Option<SessionId>,
    ) -> RepoResult<Vec<SessionId>>;
    /// Sessions of `event` that would fall outside `window`.
    fn sessions_outside(&self, event: EventId, window: TimeWindow) -> RepoResult<Vec<SessionId>>;
    fn attendee_count(&self, event: EventId) -> RepoResult<u64>;
    fn email_registered(
        &self,
        event: EventId,
        email: &str,
        exclude: Option<AttendeeId>,
    ) -> RepoResult<bool>;
    fn track_name_exists(&self, event: EventId, name: &str) -> RepoResult<bool>;
}
