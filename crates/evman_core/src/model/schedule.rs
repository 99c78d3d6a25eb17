//! Nested read model for the event schedule view.

use super::event::Event;
use super::session::Session;
use super::track::Track;
use serde::{Deserialize, Serialize};

/// One event with its tracks and each track's sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    pub event: Event,
    /// Ordered by `name ASC, uuid ASC`.
    pub tracks: Vec<TrackSchedule>,
}

/// One track with its sessions ordered by `start_at ASC, uuid ASC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSchedule {
    pub track: Track,
    pub sessions: Vec<Session>,
}

impl EventSchedule {
    /// Total number of sessions across all tracks.
    pub fn session_count(&self) -> usize {
        self.tracks.iter().map(|track| track.sessions.len()).sum()
    }
}
