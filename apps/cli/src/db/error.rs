//! Database error types.

use alifba_core::ProgressError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<DbError> for ProgressError {
    fn from(err: DbError) -> Self {
        ProgressError::Storage(err.to_string())
    }
}
