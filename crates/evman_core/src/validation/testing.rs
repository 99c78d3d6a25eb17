//! In-memory `ScheduleLookup` used by validator unit tests.

use super::ScheduleLookup;
use crate::model::attendee::{Attendee, AttendeeId};
use crate::model::event::{Event, EventId};
use crate::model::interval::TimeWindow;
use crate::model::session::{Session, SessionId};
use crate::model::track::{Track, TrackId};
use crate::model::EpochMs;
use crate::repo::RepoResult;
use uuid::Uuid;

pub(crate) const HOUR_MS: EpochMs = 60 * 60 * 1000;

#[derive(Default)]
pub(crate) struct FakeLookup {
    pub events: Vec<Event>,
    pub tracks: Vec<Track>,
    pub sessions: Vec<Session>,
    pub attendees: Vec<Attendee>,
}

impl FakeLookup {
    pub fn add_event(&mut self, start_at: EpochMs, end_at: EpochMs, capacity: i64) -> EventId {
        let uuid = Uuid::new_v4();
        self.events.push(Event {
            uuid,
            name: "Conf".to_string(),
            description: String::new(),
            start_at,
            end_at,
            venue: "Hall".to_string(),
            capacity,
            created_at: 0,
            updated_at: 0,
        });
        uuid
    }

    pub fn add_track(&mut self, event_uuid: EventId, name: &str) -> TrackId {
        let uuid = Uuid::new_v4();
        self.tracks.push(Track {
            uuid,
            event_uuid,
            name: name.to_string(),
            created_at: 0,
        });
        uuid
    }

    pub fn add_session(&mut self, track_uuid: TrackId, start_at: EpochMs, end_at: EpochMs) -> SessionId {
        let event_uuid = self
            .tracks
            .iter()
            .find(|track| track.uuid == track_uuid)
            .map(|track| track.event_uuid)
            .expect("fake session needs an existing track");
        let uuid = Uuid::new_v4();
        self.sessions.push(Session {
            uuid,
            title: "Talk".to_string(),
            description: None,
            event_uuid,
            track_uuid,
            start_at,
            end_at,
            speaker: "Speaker".to_string(),
            created_at: 0,
            updated_at: 0,
        });
        uuid
    }

    pub fn add_attendee(&mut self, event_uuid: EventId, email: &str) -> AttendeeId {
        let uuid = Uuid::new_v4();
        self.attendees.push(Attendee {
            uuid,
            name: "Guest".to_string(),
            email: email.to_string(),
            event_uuid,
            created_at: 0,
        });
        uuid
    }
}

impl ScheduleLookup for FakeLookup {
    fn event(&self, id: EventId) -> RepoResult<Option<Event>> {
        Ok(self.events.iter().find(|event| event.uuid == id).cloned())
    }

    fn track(&self, id: TrackId) -> RepoResult<Option<Track>> {
        Ok(self.tracks.iter().find(|track| track.uuid == id).cloned())
    }

    fn overlapping_events(
        &self,
        window: TimeWindow,
        exclude: Option<EventId>,
    ) -> RepoResult<Vec<EventId>> {
        Ok(self
            .events
            .iter()
            .filter(|event| Some(event.uuid) != exclude && event.window().overlaps(&window))
            .map(|event| event.uuid)
            .collect())
    }

    fn overlapping_sessions(
        &self,
        track: TrackId,
        window: TimeWindow,
        exclude: Option<SessionId>,
    ) -> RepoResult<Vec<SessionId>> {
        Ok(self
            .sessions
            .iter()
            .filter(|session| {
                session.track_uuid == track
                    && Some(session.uuid) != exclude
                    && session.window().overlaps(&window)
            })
            .map(|session| session.uuid)
            .collect())
    }

    fn sessions_outside(&self, event: EventId, window: TimeWindow) -> RepoResult<Vec<SessionId>> {
        Ok(self
            .sessions
            .iter()
            .filter(|session| session.event_uuid == event && !window.contains(&session.window()))
            .map(|session| session.uuid)
            .collect())
    }

    fn attendee_count(&self, event: EventId) -> RepoResult<u64> {
        Ok(self
            .attendees
            .iter()
            .filter(|attendee| attendee.event_uuid == event)
            .count() as u64)
    }

    fn email_registered(
        &self,
        event: EventId,
        email: &str,
        exclude: Option<AttendeeId>,
    ) -> RepoResult<bool> {
        Ok(self.attendees.iter().any(|attendee| {
            attendee.event_uuid == event && attendee.email == email && Some(attendee.uuid) != exclude
        }))
    }

    fn track_name_exists(&self, event: EventId, name: &str) -> RepoResult<bool> {
        Ok(self
            .tracks
            .iter()
            .any(|track| track.event_uuid == event && track.name == name))
    }
}
