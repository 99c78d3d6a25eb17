//! SQLite implementation of the validator read seam.
//!
//! Bound to the admission transaction so every read a validator performs
//! sees the same snapshot the subsequent write commits against.

use super::attendee_repo::{AttendeeRepository, SqliteAttendeeRepository};
use super::event_repo::{EventRepository, SqliteEventRepository};
use super::session_repo::{SessionRepository, SqliteSessionRepository};
use super::track_repo::{SqliteTrackRepository, TrackRepository};
use super::RepoResult;
use crate::model::attendee::AttendeeId;
use crate::model::event::{Event, EventId};
use crate::model::interval::TimeWindow;
use crate::model::session::SessionId;
use crate::model::track::{Track, TrackId};
use crate::validation::ScheduleLookup;
use rusqlite::Connection;

/// Validator lookups answered by the per-entity SQLite repositories.
pub struct SqliteScheduleLookup<'conn> {
    events: SqliteEventRepository<'conn>,
    tracks: SqliteTrackRepository<'conn>,
    sessions: SqliteSessionRepository<'conn>,
    attendees: SqliteAttendeeRepository<'conn>,
}

impl<'conn> SqliteScheduleLookup<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            events: SqliteEventRepository::new(conn),
            tracks: SqliteTrackRepository::new(conn),
            sessions: SqliteSessionRepository::new(conn),
            attendees: SqliteAttendeeRepository::new(conn),
        }
    }
}

impl ScheduleLookup for SqliteScheduleLookup<'_> {
    fn event(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.events.get_event(id)
    }

    fn track(&self, id: TrackId) -> RepoResult<Option<Track>> {
        self.tracks.get_track(id)
    }

    fn overlapping_events(
        &self,
        window: TimeWindow,
        exclude: Option<EventId>,
    ) -> RepoResult<Vec<EventId>> {
        self.events.overlapping_events(window, exclude)
    }

    fn overlapping_sessions(
        &self,
        track: TrackId,
        window: TimeWindow,
        exclude: Option<SessionId>,
    ) -> RepoResult<Vec<SessionId>> {
        self.sessions.overlapping_sessions(track, window, exclude)
    }

    fn sessions_outside(&self, event: EventId, window: TimeWindow) -> RepoResult<Vec<SessionId>> {
        self.sessions.sessions_outside(event, window)
    }

    fn attendee_count(&self, event: EventId) -> RepoResult<u64> {
        self.attendees.count_attendees(event)
    }

    fn email_registered(
        &self,
        event: EventId,
        email: &str,
        exclude: Option<AttendeeId>,
    ) -> RepoResult<bool> {
        self.attendees.email_registered(event, email, exclude)
    }

    fn track_name_exists(&self, event: EventId, name: &str) -> RepoResult<bool> {
        self.tracks.track_name_exists(event, name)
    }
}
