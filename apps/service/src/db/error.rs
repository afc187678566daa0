//! Database error types.

use rusqlite::ErrorCode;
use scroll_core::{DeckError, DeckId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("deck not found: {0}")]
    DeckNotFound(DeckId),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DbError {
    /// Whether SQLite rejected the statement on a schema constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
        )
    }
}

impl From<DbError> for DeckError {
    fn from(e: DbError) -> Self {
        if let DbError::DeckNotFound(id) = e {
            DeckError::NotFound(id)
        } else if e.is_constraint_violation() {
            DeckError::IntegrityViolation(e.to_string())
        } else {
            DeckError::Storage(Box::new(e))
        }
    }
}
