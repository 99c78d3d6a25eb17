//! Track use-case service.

use super::admission::{run_atomic, AdmissionResult};
use crate::config::PaginationConfig;
use crate::model::event::EventId;
use crate::model::track::{Track, TrackDraft, TrackId};
use crate::repo::lookup::SqliteScheduleLookup;
use crate::repo::track_repo::{SqliteTrackRepository, TrackRepository};
use crate::repo::ListQuery;
use crate::validation::{validate_track, Rejection};
use rusqlite::Connection;
use uuid::Uuid;

/// Use-case service for tracks, bound to one connection.
pub struct TrackService<'conn> {
    conn: &'conn Connection,
    pagination: PaginationConfig,
}

impl<'conn> TrackService<'conn> {
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

    /// Creates a track. The name is stored trimmed and must be unique
    /// within the event.
    pub fn create_track(&self, draft: &TrackDraft) -> AdmissionResult<Track> {
        let draft = TrackDraft {
            event_uuid: draft.event_uuid,
            name: draft.name.trim().to_string(),
        };
        run_atomic(self.conn, "track_create", |tx| {
            validate_track(&draft, &SqliteScheduleLookup::new(tx))?;
            Ok(SqliteTrackRepository::new(tx).insert_track(Uuid::new_v4(), &draft)?)
        })
    }

    /// Deletes a track and its sessions.
    pub fn delete_track(&self, id: TrackId) -> AdmissionResult<()> {
        run_atomic(self.conn, "track_delete", |tx| {
            Ok(SqliteTrackRepository::new(tx).delete_track(id)?)
        })
    }

    pub fn get_track(&self, id: TrackId) -> AdmissionResult<Track> {
        SqliteTrackRepository::new(self.conn)
            .get_track(id)?
            .ok_or_else(|| Rejection::not_found("track", id).into())
    }

    pub fn list_tracks_by_event(
        &self,
        event_uuid: EventId,
        query: &ListQuery,
    ) -> AdmissionResult<Vec<Track>> {
        let page = query.resolve(&self.pagination);
        Ok(SqliteTrackRepository::new(self.conn).list_tracks_by_event(event_uuid, page)?)
    }
}
