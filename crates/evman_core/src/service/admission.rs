//! Atomic admission scope and store-error classification.
//!
//! # Responsibility
//! - Run validate-then-write as one `BEGIN IMMEDIATE` transaction.
//! - Translate SQLite failures (busy/locked, unique indexes, guard triggers,
//!   named checks) into the rejection taxonomy.
//! - Emit one metadata-only log record per admission.
//!
//! # Invariants
//! - The write lock is taken before the first validator read, so two
//!   admissions against one database never interleave.
//! - Any error drops the transaction, which rolls it back.
//! - A lock wait longer than the connection busy timeout is
//!   `TransientStoreError`; nothing is written.

use crate::db::migrations::{
    GUARD_CAPACITY_EXCEEDED, GUARD_EVENT_OVERLAP, GUARD_SESSION_OUTSIDE_EVENT,
    GUARD_SESSION_OVERLAP, GUARD_SESSION_TRACK_MISMATCH,
};
use crate::repo::RepoError;
use crate::validation::{Rejection, RejectionKind, ValidationError};
use log::{error, info};
use rusqlite::{ffi, Connection, ErrorCode, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// Outcome of a failed admission or read.
#[derive(Debug)]
pub enum AdmissionError {
    /// The request was refused; nothing was written.
    Rejected(Rejection),
    /// Unexpected store failure (corruption, invalid persisted data, schema).
    Store(RepoError),
}

impl AdmissionError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Store(_) => None,
        }
    }

    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        self.rejection().map(|rejection| rejection.kind)
    }

    pub fn is_retryable(&self) -> bool {
        self.rejection_kind()
            .is_some_and(RejectionKind::is_retryable)
    }
}

impl Display for AdmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "rejected: {rejection}"),
            Self::Store(err) => write!(f, "store failure: {err}"),
        }
    }
}

impl Error for AdmissionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<Rejection> for AdmissionError {
    fn from(value: Rejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<ValidationError> for AdmissionError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::Rejected(rejection) => Self::Rejected(rejection),
            ValidationError::Lookup(err) => classify_store_error(err),
        }
    }
}

impl From<RepoError> for AdmissionError {
    fn from(value: RepoError) -> Self {
        classify_store_error(value)
    }
}

impl From<rusqlite::Error> for AdmissionError {
    fn from(value: rusqlite::Error) -> Self {
        classify_store_error(RepoError::from(value))
    }
}

/// Maps a repository failure onto the rejection taxonomy when it has a
/// business meaning, and keeps it as `Store` otherwise.
pub fn classify_store_error(err: RepoError) -> AdmissionError {
    if let RepoError::NotFound { entity, id } = &err {
        return AdmissionError::Rejected(Rejection::not_found(entity, *id));
    }
    let kind = match err.sqlite_error() {
        Some(rusqlite::Error::SqliteFailure(failure, message)) => {
            classify_sqlite_failure(failure, message.as_deref())
        }
        _ => None,
    };
    match kind {
        Some(kind) => AdmissionError::Rejected(Rejection::new(kind, err.to_string())),
        None => AdmissionError::Store(err),
    }
}

fn classify_sqlite_failure(failure: &ffi::Error, message: Option<&str>) -> Option<RejectionKind> {
    match failure.code {
        ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
            Some(RejectionKind::TransientStoreError)
        }
        ErrorCode::ConstraintViolation => match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                Some(RejectionKind::DuplicateUnique)
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(RejectionKind::NotFound),
            ffi::SQLITE_CONSTRAINT_NOTNULL => Some(RejectionKind::InvalidInput),
            ffi::SQLITE_CONSTRAINT_CHECK => {
                if message.is_some_and(|text| text.contains("interval_check")) {
                    Some(RejectionKind::InvalidInterval)
                } else {
                    Some(RejectionKind::InvalidInput)
                }
            }
            ffi::SQLITE_CONSTRAINT_TRIGGER => message.and_then(guard_token_kind),
            _ => None,
        },
        _ => None,
    }
}

fn guard_token_kind(token: &str) -> Option<RejectionKind> {
    match token {
        GUARD_EVENT_OVERLAP | GUARD_SESSION_OVERLAP => Some(RejectionKind::TemporalConflict),
        GUARD_SESSION_OUTSIDE_EVENT | GUARD_SESSION_TRACK_MISMATCH => {
            Some(RejectionKind::ContainmentViolation)
        }
        GUARD_CAPACITY_EXCEEDED => Some(RejectionKind::CapacityExceeded),
        _ => None,
    }
}

/// Runs `body` inside one immediate transaction and logs the outcome.
///
/// `operation` is the stable log event name, e.g. `attendee_create`.
pub(crate) fn run_atomic<T>(
    conn: &Connection,
    operation: &'static str,
    body: impl FnOnce(&Transaction<'_>) -> AdmissionResult<T>,
) -> AdmissionResult<T> {
    let started_at = Instant::now();
    let result = run_in_transaction(conn, body);
    log_outcome(operation, started_at, &result);
    result
}

fn run_in_transaction<T>(
    conn: &Connection,
    body: impl FnOnce(&Transaction<'_>) -> AdmissionResult<T>,
) -> AdmissionResult<T> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = body(&tx)?;
    tx.commit()?;
    Ok(value)
}

fn log_outcome<T>(operation: &str, started_at: Instant, result: &AdmissionResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={operation} module=admission status=ok duration_ms={duration_ms}"
        ),
        Err(AdmissionError::Rejected(rejection)) => info!(
            "event={operation} module=admission status=rejected kind={} duration_ms={duration_ms}",
            rejection.kind
        ),
        Err(AdmissionError::Store(err)) => error!(
            "event={operation} module=admission status=error kind=store duration_ms={duration_ms} error={err}"
        ),
    }
}
