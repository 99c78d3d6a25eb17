//! Attendee records and drafts.
//!
//! # Invariants
//! - `(event_uuid, email)` is unique.
//! - Stored `name` contains no markup; the admission pipeline sanitizes it.

use super::event::EventId;
use super::EpochMs;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable attendee identifier.
pub type AttendeeId = Uuid;

/// Stored attendee registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub uuid: AttendeeId,
    pub name: String,
    pub email: String,
    pub event_uuid: EventId,
    pub created_at: EpochMs,
}

/// Candidate registration as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub event_uuid: Option<EventId>,
}
