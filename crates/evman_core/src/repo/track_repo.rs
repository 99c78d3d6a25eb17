//! Track repository contract and SQLite implementation.
//!
//! # Invariants
//! - `(event_uuid, name)` uniqueness is enforced by the store.
//! - Deleting a track cascades to its sessions.
//! - Listing order is deterministic: `name ASC, uuid ASC`.

use super::{parse_uuid, Page, RepoError, RepoResult};
use crate::model::event::EventId;
use crate::model::track::{Track, TrackDraft, TrackId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TRACK_SELECT_SQL: &str = "SELECT
    uuid,
    event_uuid,
    name,
    created_at
FROM tracks";

/// Repository interface for track persistence.
pub trait TrackRepository {
    fn insert_track(&self, id: TrackId, draft: &TrackDraft) -> RepoResult<Track>;
    fn delete_track(&self, id: TrackId) -> RepoResult<()>;
    fn get_track(&self, id: TrackId) -> RepoResult<Option<Track>>;
    fn list_tracks_by_event(&self, event_uuid: EventId, page: Page) -> RepoResult<Vec<Track>>;
    fn track_name_exists(&self, event_uuid: EventId, name: &str) -> RepoResult<bool>;
}

/// SQLite-backed track repository.
pub struct SqliteTrackRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TrackRepository for SqliteTrackRepository<'_> {
    fn insert_track(&self, id: TrackId, draft: &TrackDraft) -> RepoResult<Track> {
        self.conn.execute(
            "INSERT INTO tracks (uuid, event_uuid, name) VALUES (?1, ?2, ?3);",
            params![
                id.to_string(),
                draft.event_uuid.map(|value| value.to_string()),
                draft.name.as_str(),
            ],
        )?;
        self.get_track(id)?
            .ok_or(RepoError::NotFound { entity: "track", id })
    }

    fn delete_track(&self, id: TrackId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tracks WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "track", id });
        }
        Ok(())
    }

    fn get_track(&self, id: TrackId) -> RepoResult<Option<Track>> {
        let track = self
            .conn
            .query_row(
                &format!("{TRACK_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_track_row(row)),
            )
            .optional()?;
        track.transpose()
    }

    fn list_tracks_by_event(&self, event_uuid: EventId, page: Page) -> RepoResult<Vec<Track>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRACK_SELECT_SQL}
             WHERE event_uuid = ?1
             ORDER BY name ASC, uuid ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![
            event_uuid.to_string(),
            i64::from(page.limit),
            i64::from(page.offset),
        ])?;
        let mut tracks = Vec::new();
        while let Some(row) = rows.next()? {
            tracks.push(parse_track_row(row)?);
        }
        Ok(tracks)
    }

    fn track_name_exists(&self, event_uuid: EventId, name: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM tracks WHERE event_uuid = ?1 AND name = ?2
            );",
            params![event_uuid.to_string(), name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_track_row(row: &Row<'_>) -> RepoResult<Track> {
    let uuid_text: String = row.get("uuid")?;
    let event_text: String = row.get("event_uuid")?;
    Ok(Track {
        uuid: parse_uuid(&uuid_text, "tracks.uuid")?,
        event_uuid: parse_uuid(&event_text, "tracks.event_uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
