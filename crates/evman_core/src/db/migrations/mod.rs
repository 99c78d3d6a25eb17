//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Integrity-guard trigger tokens are shared with
//!   `admission::classify_store_error` through the `GUARD_*` constants.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Abort token raised when an event interval overlaps another event.
pub const GUARD_EVENT_OVERLAP: &str = "event_overlap";
/// Abort token raised when a session overlaps another session on its track.
pub const GUARD_SESSION_OVERLAP: &str = "session_overlap";
/// Abort token raised when a session leaves its event interval.
pub const GUARD_SESSION_OUTSIDE_EVENT: &str = "session_outside_event";
/// Abort token raised when `sessions.event_uuid` differs from its track's event.
pub const GUARD_SESSION_TRACK_MISMATCH: &str = "session_track_mismatch";
/// Abort token raised when an attendee insert would exceed event capacity.
pub const GUARD_CAPACITY_EXCEEDED: &str = "capacity_exceeded";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_integrity_guards.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
