//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist events and answer interval queries over the global event scope.
//! - Delete events; child tracks, sessions and attendees go with them through
//!   `ON DELETE CASCADE`.
//!
//! # Invariants
//! - `updated_at` is refreshed by every successful update.
//! - List order is deterministic: `start_at ASC, uuid ASC`.

use super::{parse_uuid, Page, RepoError, RepoResult};
use crate::model::event::{Event, EventDraft, EventId};
use crate::model::interval::TimeWindow;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    start_at,
    end_at,
    venue,
    capacity,
    created_at,
    updated_at
FROM events";

/// Repository interface for event persistence.
pub trait EventRepository {
    fn insert_event(&self, id: EventId, draft: &EventDraft) -> RepoResult<Event>;
    fn update_event(&self, id: EventId, draft: &EventDraft) -> RepoResult<Event>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn list_events(&self, page: Page) -> RepoResult<Vec<Event>>;
    /// Ids of events whose interval intersects `window`, optionally skipping one.
    fn overlapping_events(
        &self,
        window: TimeWindow,
        exclude: Option<EventId>,
    ) -> RepoResult<Vec<EventId>>;
}

/// SQLite-backed event repository.
///
/// Accepts a plain connection or an open transaction (through deref).
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn insert_event(&self, id: EventId, draft: &EventDraft) -> RepoResult<Event> {
        self.conn.execute(
            "INSERT INTO events (
                uuid,
                name,
                description,
                start_at,
                end_at,
                venue,
                capacity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id.to_string(),
                draft.name.as_str(),
                draft.description.as_str(),
                draft.start_at,
                draft.end_at,
                draft.venue.as_str(),
                draft.capacity,
            ],
        )?;
        load_required_event(self.conn, id)
    }

    fn update_event(&self, id: EventId, draft: &EventDraft) -> RepoResult<Event> {
        let changed = self.conn.execute(
            "UPDATE events
             SET
                name = ?1,
                description = ?2,
                start_at = ?3,
                end_at = ?4,
                venue = ?5,
                capacity = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?7;",
            params![
                draft.name.as_str(),
                draft.description.as_str(),
                draft.start_at,
                draft.end_at,
                draft.venue.as_str(),
                draft.capacity,
                id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "event", id });
        }
        load_required_event(self.conn, id)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "event", id });
        }
        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn list_events(&self, page: Page) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             ORDER BY start_at ASC, uuid ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![i64::from(page.limit), i64::from(page.offset)])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn overlapping_events(
        &self,
        window: TimeWindow,
        exclude: Option<EventId>,
    ) -> RepoResult<Vec<EventId>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid
             FROM events
             WHERE start_at < ?1
               AND end_at > ?2
               AND (?3 IS NULL OR uuid <> ?3)
             ORDER BY start_at ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query(params![
            window.end,
            window.start,
            exclude.map(|value| value.to_string()),
        ])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "events.uuid")?);
        }
        Ok(ids)
    }
}

fn load_required_event(conn: &Connection, id: EventId) -> RepoResult<Event> {
    let event = conn
        .query_row(
            &format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"),
            [id.to_string()],
            |row| Ok(parse_event_row(row)),
        )
        .optional()?;
    match event {
        Some(event) => event,
        None => Err(RepoError::NotFound { entity: "event", id }),
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let uuid_text: String = row.get("uuid")?;
    let event = Event {
        uuid: parse_uuid(&uuid_text, "events.uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        start_at: row.get("start_at")?,
        end_at: row.get("end_at")?,
        venue: row.get("venue")?,
        capacity: row.get("capacity")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    if !event.window().is_well_formed() {
        return Err(RepoError::InvalidData(format!(
            "event {} has end_at {} <= start_at {}",
            event.uuid, event.end_at, event.start_at
        )));
    }
    Ok(event)
}
