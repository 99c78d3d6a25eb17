//! Nested schedule read path.
//!
//! # Responsibility
//! - Load one event with its tracks and sessions in a single
//!   `events ⟕ tracks ⟕ sessions` query.
//! - Fold the flat join rows into `EventSchedule`.
//!
//! # Invariants
//! - Rows are ordered by track (`name, uuid`) then session (`start_at, uuid`)
//!   so folding is a single forward pass.
//! - The "current" event is the one whose `[start_at, end_at)` contains the
//!   instant; event non-overlap guarantees at most one.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::event::{Event, EventId};
use crate::model::schedule::{EventSchedule, TrackSchedule};
use crate::model::session::Session;
use crate::model::track::Track;
use crate::model::EpochMs;
use rusqlite::{Connection, Params, Row};

const SCHEDULE_SELECT_SQL: &str = "SELECT
    e.uuid AS e_uuid,
    e.name AS e_name,
    e.description AS e_description,
    e.start_at AS e_start_at,
    e.end_at AS e_end_at,
    e.venue AS e_venue,
    e.capacity AS e_capacity,
    e.created_at AS e_created_at,
    e.updated_at AS e_updated_at,
    t.uuid AS t_uuid,
    t.name AS t_name,
    t.created_at AS t_created_at,
    s.uuid AS s_uuid,
    s.title AS s_title,
    s.description AS s_description,
    s.start_at AS s_start_at,
    s.end_at AS s_end_at,
    s.speaker AS s_speaker,
    s.created_at AS s_created_at,
    s.updated_at AS s_updated_at
FROM events e
LEFT JOIN tracks t ON t.event_uuid = e.uuid
LEFT JOIN sessions s ON s.track_uuid = t.uuid";

const SCHEDULE_ORDER_SQL: &str =
    "ORDER BY t.name ASC, t.uuid ASC, s.start_at ASC, s.uuid ASC";

/// Read-only access to nested event schedules.
pub trait ScheduleRepository {
    /// Schedule of the event running at `at`, if any.
    fn schedule_at(&self, at: EpochMs) -> RepoResult<Option<EventSchedule>>;
    /// Schedule of one event by id.
    fn schedule_for_event(&self, event_uuid: EventId) -> RepoResult<Option<EventSchedule>>;
}

/// SQLite-backed schedule reader.
pub struct SqliteScheduleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScheduleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load(&self, filter: &str, params: impl Params) -> RepoResult<Option<EventSchedule>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SCHEDULE_SELECT_SQL} {filter} {SCHEDULE_ORDER_SQL};"))?;
        let mut rows = stmt.query(params)?;
        let mut schedule: Option<EventSchedule> = None;
        while let Some(row) = rows.next()? {
            if schedule.is_none() {
                schedule = Some(EventSchedule {
                    event: parse_event_columns(row)?,
                    tracks: Vec::new(),
                });
            }
            if let Some(current) = schedule.as_mut() {
                fold_row(current, row)?;
            }
        }
        Ok(schedule)
    }
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn schedule_at(&self, at: EpochMs) -> RepoResult<Option<EventSchedule>> {
        // Half-open `[start_at, end_at)`, the same bounds `TimeWindow::overlaps` uses.
        self.load(
            "WHERE e.uuid = (
                SELECT uuid FROM events
                WHERE start_at <= ?1 AND end_at > ?1
                ORDER BY start_at ASC, uuid ASC
                LIMIT 1
            )",
            [at],
        )
    }

    fn schedule_for_event(&self, event_uuid: EventId) -> RepoResult<Option<EventSchedule>> {
        self.load("WHERE e.uuid = ?1", [event_uuid.to_string()])
    }
}

fn fold_row(schedule: &mut EventSchedule, row: &Row<'_>) -> RepoResult<()> {
    let Some(track_text) = row.get::<_, Option<String>>("t_uuid")? else {
        return Ok(());
    };
    let track_uuid = parse_uuid(&track_text, "tracks.uuid")?;

    let starts_new_track = schedule
        .tracks
        .last()
        .map_or(true, |last| last.track.uuid != track_uuid);
    if starts_new_track {
        schedule.tracks.push(TrackSchedule {
            track: Track {
                uuid: track_uuid,
                event_uuid: schedule.event.uuid,
                name: row.get("t_name")?,
                created_at: row.get("t_created_at")?,
            },
            sessions: Vec::new(),
        });
    }

    let Some(session_text) = row.get::<_, Option<String>>("s_uuid")? else {
        return Ok(());
    };
    let session = Session {
        uuid: parse_uuid(&session_text, "sessions.uuid")?,
        title: row.get("s_title")?,
        description: row.get("s_description")?,
        event_uuid: schedule.event.uuid,
        track_uuid,
        start_at: row.get("s_start_at")?,
        end_at: row.get("s_end_at")?,
        speaker: row.get("s_speaker")?,
        created_at: row.get("s_created_at")?,
        updated_at: row.get("s_updated_at")?,
    };
    match schedule.tracks.last_mut() {
        Some(track) => track.sessions.push(session),
        None => {
            return Err(RepoError::InvalidData(format!(
                "session {} joined without a track",
                session.uuid
            )))
        }
    }
    Ok(())
}

fn parse_event_columns(row: &Row<'_>) -> RepoResult<Event> {
    let uuid_text: String = row.get("e_uuid")?;
    Ok(Event {
        uuid: parse_uuid(&uuid_text, "events.uuid")?,
        name: row.get("e_name")?,
        description: row.get("e_description")?,
        start_at: row.get("e_start_at")?,
        end_at: row.get("e_end_at")?,
        venue: row.get("e_venue")?,
        capacity: row.get("e_capacity")?,
        created_at: row.get("e_created_at")?,
        updated_at: row.get("e_updated_at")?,
    })
}
