//! Event records, drafts and patches.
//!
//! # Invariants
//! - `end_at > start_at`.
//! - No two stored events overlap under half-open semantics.
//! - `capacity >= 0` and never below the event's attendee count.

use super::interval::TimeWindow;
use super::EpochMs;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable event identifier.
pub type EventId = Uuid;

/// Stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub uuid: EventId,
    pub name: String,
    pub description: String,
    pub start_at: EpochMs,
    pub end_at: EpochMs,
    pub venue: String,
    /// Maximum number of attendees.
    pub capacity: i64,
    /// Store-assigned epoch ms.
    pub created_at: EpochMs,
    /// Store-assigned epoch ms, refreshed on every update.
    pub updated_at: EpochMs,
}

impl Event {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_at, self.end_at)
    }

    /// Returns the client-mutable fields as a draft.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            start_at: self.start_at,
            end_at: self.end_at,
            venue: self.venue.clone(),
            capacity: self.capacity,
        }
    }
}

/// Candidate event submitted for admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_at: EpochMs,
    pub end_at: EpochMs,
    pub venue: String,
    pub capacity: i64,
}

impl EventDraft {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_at, self.end_at)
    }
}

/// Partial event update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<EpochMs>,
    pub end_at: Option<EpochMs>,
    pub venue: Option<String>,
    pub capacity: Option<i64>,
}

impl EventPatch {
    /// Merges this patch over a stored event.
    pub fn apply_to(&self, current: &Event) -> EventDraft {
        let mut draft = current.to_draft();
        if let Some(name) = &self.name {
            draft.name = name.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(start_at) = self.start_at {
            draft.start_at = start_at;
        }
        if let Some(end_at) = self.end_at {
            draft.end_at = end_at;
        }
        if let Some(venue) = &self.venue {
            draft.venue = venue.clone();
        }
        if let Some(capacity) = self.capacity {
            draft.capacity = capacity;
        }
        draft
    }
}
