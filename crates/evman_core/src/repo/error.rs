//! Repository error type shared by all entity repositories.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and query failure.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error, including constraint violations.
    Db(DbError),
    /// Target row does not exist.
    NotFound { entity: &'static str, id: Uuid },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl RepoError {
    /// Returns the SQLite error when this failure came from the driver.
    pub fn sqlite_error(&self) -> Option<&rusqlite::Error> {
        match self {
            Self::Db(DbError::Sqlite(err)) => Some(err),
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

#[cfg(test)]
mod tests {
    use super::RepoError;
    use uuid::Uuid;

    #[test]
    fn sqlite_error_is_exposed_only_for_driver_failures() {
        let driver = RepoError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(
            driver.sqlite_error(),
            Some(rusqlite::Error::QueryReturnedNoRows)
        ));

        let missing = RepoError::NotFound {
            entity: "event",
            id: Uuid::nil(),
        };
        assert!(missing.sqlite_error().is_none());
        assert!(RepoError::InvalidData("bad".to_string())
            .sqlite_error()
            .is_none());
    }
}
