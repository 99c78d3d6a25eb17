//! Event use-case service.
//!
//! # Responsibility
//! - Admit event creates and updates through the temporal validator.
//! - Delete events with their tracks, sessions and attendees.
//!
//! # Invariants
//! - No two stored events overlap after any successful create or update.
//! - An update keeps every session of the event inside the new window and
//!   capacity at or above the attendee count.

use super::admission::{run_atomic, AdmissionResult};
use crate::config::PaginationConfig;
use crate::model::event::{Event, EventDraft, EventId, EventPatch};
use crate::repo::event_repo::{EventRepository, SqliteEventRepository};
use crate::repo::lookup::SqliteScheduleLookup;
use crate::repo::ListQuery;
use crate::validation::{validate_event, validate_event_update, Rejection};
use rusqlite::Connection;
use uuid::Uuid;

/// Use-case service for events, bound to one connection.
pub struct EventService<'conn> {
    conn: &'conn Connection,
    pagination: PaginationConfig,
}

impl<'conn> EventService<'conn> {
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

    /// Admits a new event and returns it as stored.
    pub fn create_event(&self, draft: &EventDraft) -> AdmissionResult<Event> {
        run_atomic(self.conn, "event_create", |tx| {
            validate_event(draft, None, &SqliteScheduleLookup::new(tx))?;
            Ok(SqliteEventRepository::new(tx).insert_event(Uuid::new_v4(), draft)?)
        })
    }

    /// Applies `patch` over the stored event and re-admits the result.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    /// - `TemporalConflict` when the new window overlaps another event.
    /// - `ContainmentViolation` when a session would fall outside the window.
    /// - `CapacityExceeded` when capacity drops below the attendee count.
    pub fn update_event(&self, id: EventId, patch: &EventPatch) -> AdmissionResult<Event> {
        run_atomic(self.conn, "event_update", |tx| {
            let repo = SqliteEventRepository::new(tx);
            let Some(current) = repo.get_event(id)? else {
                return Err(Rejection::not_found("event", id).into());
            };
            let draft = patch.apply_to(&current);
            validate_event_update(id, &draft, &SqliteScheduleLookup::new(tx))?;
            Ok(repo.update_event(id, &draft)?)
        })
    }

    /// Deletes an event; tracks, sessions and attendees cascade.
    pub fn delete_event(&self, id: EventId) -> AdmissionResult<()> {
        run_atomic(self.conn, "event_delete", |tx| {
            Ok(SqliteEventRepository::new(tx).delete_event(id)?)
        })
    }

    pub fn get_event(&self, id: EventId) -> AdmissionResult<Event> {
        SqliteEventRepository::new(self.conn)
            .get_event(id)?
            .ok_or_else(|| Rejection::not_found("event", id).into())
    }

    /// Lists events ordered by `start_at ASC, uuid ASC`.
    pub fn list_events(&self, query: &ListQuery) -> AdmissionResult<Vec<Event>> {
        let page = query.resolve(&self.pagination);
        Ok(SqliteEventRepository::new(self.conn).list_events(page)?)
    }
}
