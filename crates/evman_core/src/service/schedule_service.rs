//! Nested schedule read service.

use super::admission::AdmissionResult;
use crate::model::event::EventId;
use crate::model::schedule::EventSchedule;
use crate::model::EpochMs;
use crate::repo::schedule_repo::{ScheduleRepository, SqliteScheduleRepository};
use crate::validation::Rejection;
use rusqlite::Connection;

/// Read-only service for the event schedule view.
pub struct ScheduleService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ScheduleService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the event running at `at` with its tracks and sessions, or
    /// `None` when no event's `[start_at, end_at)` contains `at`.
    pub fn current_event(&self, at: EpochMs) -> AdmissionResult<Option<EventSchedule>> {
        Ok(SqliteScheduleRepository::new(self.conn).schedule_at(at)?)
    }

    pub fn event_schedule(&self, event_uuid: EventId) -> AdmissionResult<EventSchedule> {
        SqliteScheduleRepository::new(self.conn)
            .schedule_for_event(event_uuid)?
            .ok_or_else(|| Rejection::not_found("event", event_uuid).into())
    }
}
