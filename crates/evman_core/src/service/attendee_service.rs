//! Attendee registration service.
//!
//! # Responsibility
//! - Sanitize the attendee name, then admit the registration against event
//!   capacity and per-event email uniqueness.
//!
//! # Invariants
//! - Count and insert share one immediate transaction, so concurrent
//!   registrations cannot both take the last seat.
//! - Stored names never contain markup.

use super::admission::{run_atomic, AdmissionResult};
use crate::config::PaginationConfig;
use crate::model::attendee::{Attendee, AttendeeDraft, AttendeeId};
use crate::model::event::EventId;
use crate::repo::attendee_repo::{AttendeeRepository, SqliteAttendeeRepository};
use crate::repo::lookup::SqliteScheduleLookup;
use crate::repo::ListQuery;
use crate::validation::{sanitize_markup, validate_attendee, Rejection};
use rusqlite::Connection;
use uuid::Uuid;

/// Use-case service for attendees, bound to one connection.
pub struct AttendeeService<'conn> {
    conn: &'conn Connection,
    pagination: PaginationConfig,
}

impl<'conn> AttendeeService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            pagination: PaginationConfig::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Registers an attendee.
    ///
    /// # Errors
    /// - `InvalidInput` for a blank sanitized name, malformed email or
    ///   missing event reference.
    /// - `NotFound` when the event does not exist.
    /// - `CapacityExceeded` when the event is full.
    /// - `DuplicateUnique` when the email is already registered for the event.
    /// - `TransientStoreError` when the write lock could not be taken in time.
    pub fn create_attendee(&self, draft: &AttendeeDraft) -> AdmissionResult<Attendee> {
        let draft = AttendeeDraft {
            name: sanitize_markup(&draft.name),
            email: draft.email.trim().to_string(),
            event_uuid: draft.event_uuid,
        };
        run_atomic(self.conn, "attendee_create", |tx| {
            validate_attendee(&draft, None, &SqliteScheduleLookup::new(tx))?;
            Ok(SqliteAttendeeRepository::new(tx).insert_attendee(Uuid::new_v4(), &draft)?)
        })
    }

    pub fn get_attendee(&self, id: AttendeeId) -> AdmissionResult<Attendee> {
        SqliteAttendeeRepository::new(self.conn)
            .get_attendee(id)?
            .ok_or_else(|| Rejection::not_found("attendee", id).into())
    }

    pub fn list_attendees(&self, query: &ListQuery) -> AdmissionResult<Vec<Attendee>> {
        let page = query.resolve(&self.pagination);
        Ok(SqliteAttendeeRepository::new(self.conn).list_attendees(page)?)
    }

    /// Registrations of one event in registration order; empty when none.
    pub fn list_attendees_by_event(&self, event_uuid: EventId) -> AdmissionResult<Vec<Attendee>> {
        Ok(SqliteAttendeeRepository::new(self.conn).list_attendees_by_event(event_uuid)?)
    }
}
