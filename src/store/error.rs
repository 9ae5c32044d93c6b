//! Error types for the canvas and agent store

use crate::models::RecordKind;
use thiserror::Error;

/// Store error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another record of the same kind already uses this name
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName { kind: RecordKind, name: String },

    /// Names must contain at least one non-whitespace character
    #[error("{0} name must not be empty")]
    EmptyName(RecordKind),

    /// An update targeted an id with no row behind it
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: i64 },

    /// Creating the database directory failed
    #[error("IO error: {0}")]
    Io(String),

    /// Any other SQLite failure
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, StoreError::DuplicateName { .. })
    }

    /// Map a failed write into `DuplicateName` when it tripped the `name` UNIQUE index
    pub(crate) fn from_write(err: rusqlite::Error, kind: RecordKind, name: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::DuplicateName {
                    kind,
                    name: name.to_string(),
                }
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
