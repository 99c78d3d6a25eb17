//! Attendee repository contract and SQLite implementation.
//!
//! # Invariants
//! - `(event_uuid, email)` uniqueness is enforced by the store.
//! - Inserts above event capacity are aborted by the capacity guard trigger.
//! - Listing order is registration order: `created_at ASC, rowid ASC`.

use super::{parse_uuid, Page, RepoError, RepoResult};
use crate::model::attendee::{Attendee, AttendeeDraft, AttendeeId};
use crate::model::event::EventId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ATTENDEE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    email,
    event_uuid,
    created_at
FROM attendees";

/// Repository interface for attendee persistence.
pub trait AttendeeRepository {
    /// Inserts a registration. `draft.name` must already be sanitized.
    fn insert_attendee(&self, id: AttendeeId, draft: &AttendeeDraft) -> RepoResult<Attendee>;
    fn get_attendee(&self, id: AttendeeId) -> RepoResult<Option<Attendee>>;
    fn list_attendees(&self, page: Page) -> RepoResult<Vec<Attendee>>;
    fn list_attendees_by_event(&self, event_uuid: EventId) -> RepoResult<Vec<Attendee>>;
    fn count_attendees(&self, event_uuid: EventId) -> RepoResult<u64>;
    fn email_registered(
        &self,
        event_uuid: EventId,
        email: &str,
        exclude: Option<AttendeeId>,
    ) -> RepoResult<bool>;
}

/// SQLite-backed attendee repository.
pub struct SqliteAttendeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_attendees(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Attendee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut attendees = Vec::new();
        while let Some(row) = rows.next()? {
            attendees.push(parse_attendee_row(row)?);
        }
        Ok(attendees)
    }
}

impl AttendeeRepository for SqliteAttendeeRepository<'_> {
    fn insert_attendee(&self, id: AttendeeId, draft: &AttendeeDraft) -> RepoResult<Attendee> {
        self.conn.execute(
            "INSERT INTO attendees (uuid, name, email, event_uuid) VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                draft.name.as_str(),
                draft.email.as_str(),
                draft.event_uuid.map(|value| value.to_string()),
            ],
        )?;
        self.get_attendee(id)?
            .ok_or(RepoError::NotFound { entity: "attendee", id })
    }

    fn get_attendee(&self, id: AttendeeId) -> RepoResult<Option<Attendee>> {
        let attendee = self
            .conn
            .query_row(
                &format!("{ATTENDEE_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_attendee_row(row)),
            )
            .optional()?;
        attendee.transpose()
    }

    fn list_attendees(&self, page: Page) -> RepoResult<Vec<Attendee>> {
        self.query_attendees(
            &format!(
                "{ATTENDEE_SELECT_SQL}
                 ORDER BY created_at ASC, rowid ASC
                 LIMIT ?1 OFFSET ?2;"
            ),
            params![i64::from(page.limit), i64::from(page.offset)],
        )
    }

    fn list_attendees_by_event(&self, event_uuid: EventId) -> RepoResult<Vec<Attendee>> {
        self.query_attendees(
            &format!(
                "{ATTENDEE_SELECT_SQL}
                 WHERE event_uuid = ?1
                 ORDER BY created_at ASC, rowid ASC;"
            ),
            [event_uuid.to_string()],
        )
    }

    fn count_attendees(&self, event_uuid: EventId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM attendees WHERE event_uuid = ?1;",
            [event_uuid.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative attendee count {count}")))
    }

    fn email_registered(
        &self,
        event_uuid: EventId,
        email: &str,
        exclude: Option<AttendeeId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM attendees
                WHERE event_uuid = ?1
                  AND email = ?2
                  AND (?3 IS NULL OR uuid <> ?3)
            );",
            params![
                event_uuid.to_string(),
                email,
                exclude.map(|value| value.to_string()),
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_attendee_row(row: &Row<'_>) -> RepoResult<Attendee> {
    let uuid_text: String = row.get("uuid")?;
    let event_text: String = row.get("event_uuid")?;
    Ok(Attendee {
        uuid: parse_uuid(&uuid_text, "attendees.uuid")?,
        name: row.get("name")?,
        email: row.get("email")?,
        event_uuid: parse_uuid(&event_text, "attendees.event_uuid")?,
        created_at: row.get("created_at")?,
    })
}
