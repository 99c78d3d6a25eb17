//! Session repository contract and SQLite implementation.
//!
//! # Invariants
//! - Overlap queries are scoped to one track.
//! - Listing order is deterministic: `start_at ASC, uuid ASC`.

use super::{parse_uuid, Page, RepoError, RepoResult};
use crate::model::event::EventId;
use crate::model::interval::TimeWindow;
use crate::model::session::{Session, SessionDraft, SessionId};
use crate::model::track::TrackId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SESSION_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    event_uuid,
    track_uuid,
    start_at,
    end_at,
    speaker,
    created_at,
    updated_at
FROM sessions";

/// Repository interface for session persistence.
pub trait SessionRepository {
    fn insert_session(&self, id: SessionId, draft: &SessionDraft) -> RepoResult<Session>;
    fn update_session(&self, id: SessionId, draft: &SessionDraft) -> RepoResult<Session>;
    fn delete_session(&self, id: SessionId) -> RepoResult<()>;
    fn get_session(&self, id: SessionId) -> RepoResult<Option<Session>>;
    fn list_sessions(&self, page: Page) -> RepoResult<Vec<Session>>;
    fn list_sessions_by_event(&self, event_uuid: EventId) -> RepoResult<Vec<Session>>;
    /// Ids of sessions on `track_uuid` whose interval intersects `window`.
    fn overlapping_sessions(
        &self,
        track_uuid: TrackId,
        window: TimeWindow,
        exclude: Option<SessionId>,
    ) -> RepoResult<Vec<SessionId>>;
    /// Ids of sessions of `event_uuid` that do not fit inside `window`.
    fn sessions_outside(
        &self,
        event_uuid: EventId,
        window: TimeWindow,
    ) -> RepoResult<Vec<SessionId>>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn collect_ids(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<SessionId>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "sessions.uuid")?);
        }
        Ok(ids)
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn insert_session(&self, id: SessionId, draft: &SessionDraft) -> RepoResult<Session> {
        self.conn.execute(
            "INSERT INTO sessions (
                uuid,
                title,
                description,
                event_uuid,
                track_uuid,
                start_at,
                end_at,
                speaker
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                id.to_string(),
                draft.title.as_str(),
                draft.description.as_deref(),
                draft.event_uuid.to_string(),
                draft.track_uuid.map(|value| value.to_string()),
                draft.start_at,
                draft.end_at,
                draft.speaker.as_str(),
            ],
        )?;
        self.get_session(id)?
            .ok_or(RepoError::NotFound { entity: "session", id })
    }

    fn update_session(&self, id: SessionId, draft: &SessionDraft) -> RepoResult<Session> {
        let changed = self.conn.execute(
            "UPDATE sessions
             SET
                title = ?1,
                description = ?2,
                event_uuid = ?3,
                track_uuid = ?4,
                start_at = ?5,
                end_at = ?6,
                speaker = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?8;",
            params![
                draft.title.as_str(),
                draft.description.as_deref(),
                draft.event_uuid.to_string(),
                draft.track_uuid.map(|value| value.to_string()),
                draft.start_at,
                draft.end_at,
                draft.speaker.as_str(),
                id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "session", id });
        }
        self.get_session(id)?
            .ok_or(RepoError::NotFound { entity: "session", id })
    }

    fn delete_session(&self, id: SessionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "session", id });
        }
        Ok(())
    }

    fn get_session(&self, id: SessionId) -> RepoResult<Option<Session>> {
        let session = self
            .conn
            .query_row(
                &format!("{SESSION_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_session_row(row)),
            )
            .optional()?;
        session.transpose()
    }

    fn list_sessions(&self, page: Page) -> RepoResult<Vec<Session>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SESSION_SELECT_SQL}
             ORDER BY start_at ASC, uuid ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![i64::from(page.limit), i64::from(page.offset)])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            sessions.push(parse_session_row(row)?);
        }
        Ok(sessions)
    }

    fn list_sessions_by_event(&self, event_uuid: EventId) -> RepoResult<Vec<Session>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SESSION_SELECT_SQL}
             WHERE event_uuid = ?1
             ORDER BY start_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([event_uuid.to_string()])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            sessions.push(parse_session_row(row)?);
        }
        Ok(sessions)
    }

    fn overlapping_sessions(
        &self,
        track_uuid: TrackId,
        window: TimeWindow,
        exclude: Option<SessionId>,
    ) -> RepoResult<Vec<SessionId>> {
        self.collect_ids(
            "SELECT uuid
             FROM sessions
             WHERE track_uuid = ?1
               AND start_at < ?2
               AND end_at > ?3
               AND (?4 IS NULL OR uuid <> ?4)
             ORDER BY start_at ASC, uuid ASC;",
            params![
                track_uuid.to_string(),
                window.end,
                window.start,
                exclude.map(|value| value.to_string()),
            ],
        )
    }

    fn sessions_outside(
        &self,
        event_uuid: EventId,
        window: TimeWindow,
    ) -> RepoResult<Vec<SessionId>> {
        self.collect_ids(
            "SELECT uuid
             FROM sessions
             WHERE event_uuid = ?1
               AND (start_at < ?2 OR end_at > ?3)
             ORDER BY start_at ASC, uuid ASC;",
            params![event_uuid.to_string(), window.start, window.end],
        )
    }
}

fn parse_session_row(row: &Row<'_>) -> RepoResult<Session> {
    let uuid_text: String = row.get("uuid")?;
    let event_text: String = row.get("event_uuid")?;
    let track_text: String = row.get("track_uuid")?;
    let session = Session {
        uuid: parse_uuid(&uuid_text, "sessions.uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        event_uuid: parse_uuid(&event_text, "sessions.event_uuid")?,
        track_uuid: parse_uuid(&track_text, "sessions.track_uuid")?,
        start_at: row.get("start_at")?,
        end_at: row.get("end_at")?,
        speaker: row.get("speaker")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    if !session.window().is_well_formed() {
        return Err(RepoError::InvalidData(format!(
            "session {} has end_at {} <= start_at {}",
            session.uuid, session.end_at, session.start_at
        )));
    }
    Ok(session)
}
