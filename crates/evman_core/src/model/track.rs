//! Track records and drafts.

use super::event::EventId;
use super::EpochMs;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable track identifier.
pub type TrackId = Uuid;

/// Stored track. `name` is unique within `event_uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub uuid: TrackId,
    pub event_uuid: EventId,
    pub name: String,
    pub created_at: EpochMs,
}

/// Candidate track. `event_uuid` is optional so a missing reference is
/// reported as a rejection rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDraft {
    #[serde(default)]
    pub event_uuid: Option<EventId>,
    pub name: String,
}
