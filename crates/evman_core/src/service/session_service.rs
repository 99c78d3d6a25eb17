//! Session use-case service.
//!
//! # Invariants
//! - A stored session lies inside its event, references a track of the same
//!   event, and never overlaps another session on that track.
//! - Updates re-run every check on the merged state, excluding the session
//!   itself from the overlap scope.

use super::admission::{run_atomic, AdmissionResult};
use crate::config::PaginationConfig;
use crate::model::event::EventId;
use crate::model::session::{Session, SessionDraft, SessionId, SessionPatch};
use crate::repo::lookup::SqliteScheduleLookup;
use crate::repo::session_repo::{SessionRepository, SqliteSessionRepository};
use crate::repo::ListQuery;
use crate::validation::{validate_session, Rejection};
use rusqlite::Connection;
use uuid::Uuid;

/// Use-case service for sessions, bound to one connection.
pub struct SessionService<'conn> {
    conn: &'conn Connection,
    pagination: PaginationConfig,
}

impl<'conn> SessionService<'conn> {
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

    pub fn create_session(&self, draft: &SessionDraft) -> AdmissionResult<Session> {
        run_atomic(self.conn, "session_create", |tx| {
            validate_session(draft, None, &SqliteScheduleLookup::new(tx))?;
            Ok(SqliteSessionRepository::new(tx).insert_session(Uuid::new_v4(), draft)?)
        })
    }

    /// Applies `patch` over the stored session and re-admits the result.
    pub fn update_session(&self, id: SessionId, patch: &SessionPatch) -> AdmissionResult<Session> {
        run_atomic(self.conn, "session_update", |tx| {
            let repo = SqliteSessionRepository::new(tx);
            let Some(current) = repo.get_session(id)? else {
                return Err(Rejection::not_found("session", id).into());
            };
            let draft = patch.apply_to(&current);
            validate_session(&draft, Some(id), &SqliteScheduleLookup::new(tx))?;
            Ok(repo.update_session(id, &draft)?)
        })
    }

    pub fn delete_session(&self, id: SessionId) -> AdmissionResult<()> {
        run_atomic(self.conn, "session_delete", |tx| {
            Ok(SqliteSessionRepository::new(tx).delete_session(id)?)
        })
    }

    pub fn get_session(&self, id: SessionId) -> AdmissionResult<Session> {
        SqliteSessionRepository::new(self.conn)
            .get_session(id)?
            .ok_or_else(|| Rejection::not_found("session", id).into())
    }

    pub fn list_sessions(&self, query: &ListQuery) -> AdmissionResult<Vec<Session>> {
        let page = query.resolve(&self.pagination);
        Ok(SqliteSessionRepository::new(self.conn).list_sessions(page)?)
    }

    /// All sessions of one event, ordered by `start_at ASC, uuid ASC`.
    pub fn list_sessions_by_event(&self, event_uuid: EventId) -> AdmissionResult<Vec<Session>> {
        Ok(SqliteSessionRepository::new(self.conn).list_sessions_by_event(event_uuid)?)
    }
}
