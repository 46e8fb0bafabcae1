//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl DbError {
    /// Translate a unique-index violation into `Duplicate`, keeping any
    /// other sqlx failure as a connection-level error.
    pub(crate) fn from_write(err: sqlx::Error, duplicate: impl FnOnce() -> String) -> Self {
        let is_unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);

        if is_unique {
            DbError::Duplicate(duplicate())
        } else {
            DbError::Connection(err)
        }
    }
}
