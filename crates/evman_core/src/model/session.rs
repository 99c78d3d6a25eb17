//! Session records, drafts and patches.
//!
//! # Invariants
//! - `end_at > start_at`.
//! - `[start_at, end_at)` lies inside the owning event's interval.
//! - `event_uuid` equals the owning track's event.
//! - Sessions sharing a track never overlap.

use super::event::EventId;
use super::interval::TimeWindow;
use super::track::TrackId;
use super::EpochMs;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable session identifier.
pub type SessionId = Uuid;

/// Stored session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uuid: SessionId,
    pub title: String,
    pub description: Option<String>,
    /// Denormalized copy of the track's event.
    pub event_uuid: EventId,
    pub track_uuid: TrackId,
    pub start_at: EpochMs,
    pub end_at: EpochMs,
    pub speaker: String,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl Session {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_at, self.end_at)
    }

    pub fn to_draft(&self) -> SessionDraft {
        SessionDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            event_uuid: self.event_uuid,
            track_uuid: Some(self.track_uuid),
            start_at: self.start_at,
            end_at: self.end_at,
            speaker: self.speaker.clone(),
        }
    }
}

/// Candidate session submitted for admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_uuid: EventId,
    #[serde(default)]
    pub track_uuid: Option<TrackId>,
    pub start_at: EpochMs,
    pub end_at: EpochMs,
    pub speaker: String,
}

impl SessionDraft {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_at, self.end_at)
    }
}

/// Partial session update. `None` keeps the stored value; `description`
/// uses `Some(None)` to clear the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub event_uuid: Option<EventId>,
    pub track_uuid: Option<TrackId>,
    pub start_at: Option<EpochMs>,
    pub end_at: Option<EpochMs>,
    pub speaker: Option<String>,
}

impl SessionPatch {
    /// Merges this patch over a stored session.
    pub fn apply_to(&self, current: &Session) -> SessionDraft {
        let mut draft = current.to_draft();
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(event_uuid) = self.event_uuid {
            draft.event_uuid = event_uuid;
        }
        if let Some(track_uuid) = self.track_uuid {
            draft.track_uuid = Some(track_uuid);
        }
        if let Some(start_at) = self.start_at {
            draft.start_at = start_at;
        }
        if let Some(end_at) = self.end_at {
            draft.end_at = end_at;
        }
        if let Some(speaker) = &self.speaker {
            draft.speaker = speaker.clone();
        }
        draft
    }
}
