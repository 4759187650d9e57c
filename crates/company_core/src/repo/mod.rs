//! Repository layer: row mapping and SQL for departments and employees.
//!
//! # Responsibility
//! - Define data access contracts per entity.
//! - Keep SQLite statements out of service/business orchestration.
//!
//! # Invariants
//! - Every write is a single statement; outside an explicit transaction it
//!   auto-commits.
//! - Storage errors are surfaced unchanged inside `RepoError::Db`.

use crate::db::DbError;
use rusqlite::{ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod department_repo;
pub mod employee_repo;
pub mod identity_map;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for department/employee persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Error raised by SQLite (constraint, missing table, I/O...).
    Db(DbError),
    /// Persisted row cannot be mapped onto a record.
    InvalidData(String),
    /// A shared record handle was already borrowed while the repository
    /// needed to read or refresh it. Carries the entity name.
    RecordBusy(&'static str),
}

impl RepoError {
    /// Returns whether SQLite rejected the statement with a constraint
    /// violation (`UNIQUE`, `FOREIGN KEY`, ...).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Db(err) => err.sqlite_code() == Some(ErrorCode::ConstraintViolation),
            Self::InvalidData(_) | Self::RecordBusy(_) => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::RecordBusy(entity) => write!(f, "{entity} record is already borrowed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::RecordBusy(_) => None,
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

/// Result of an update/delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The statement ran and touched the record's row.
    Applied,
    /// The record has no id; no statement was issued.
    NotPersisted,
    /// The statement ran but no row carried the record's id.
    RowMissing,
}

impl WriteOutcome {
    pub(crate) fn from_changed(changed: usize) -> Self {
        if changed == 0 {
            Self::RowMissing
        } else {
            Self::Applied
        }
    }
}

/// Reads a nullable TEXT column that the record model requires.
pub(crate) fn required_text(row: &Row<'_>, table: &str, column: &str) -> RepoResult<String> {
    match row.get::<_, Option<String>>(column)? {
        Some(value) => Ok(value),
        None => {
            let id: i64 = row.get("id")?;
            Err(RepoError::InvalidData(format!(
                "{table}.{column} is NULL for id {id}"
            )))
        }
    }
}
