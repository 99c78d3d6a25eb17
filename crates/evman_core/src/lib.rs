//! Core domain logic for EvMan.
//! This crate is the single source of truth for scheduling invariants:
//! event non-overlap, session containment and non-overlap per track, and
//! attendee capacity/uniqueness under concurrent writes.

pub mod access;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use access::{AccessPolicy, PublicRoute};
pub use config::{ConfigError, CoreConfig, PaginationConfig, StoreConfig};
pub use db::{open_db, open_db_in_memory, open_db_with_config, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendee::{Attendee, AttendeeDraft, AttendeeId};
pub use model::event::{Event, EventDraft, EventId, EventPatch};
pub use model::interval::TimeWindow;
pub use model::schedule::{EventSchedule, TrackSchedule};
pub use model::session::{Session, SessionDraft, SessionId, SessionPatch};
pub use model::track::{Track, TrackDraft, TrackId};
pub use model::EpochMs;
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::admission::{AdmissionError, AdmissionResult};
pub use service::attendee_service::AttendeeService;
pub use service::event_service::EventService;
pub use service::schedule_service::ScheduleService;
pub use service::session_service::SessionService;
pub use service::track_service::TrackService;
pub use validation::{Rejection, RejectionKind};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
