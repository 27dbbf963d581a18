//! Errors for archive store operations.

use thiserror::Error;

/// Errors that can occur during archive repository operations.
///
/// Archive failures are best-effort from the picking workflow's point of
/// view: callers log them and carry on with the in-memory load. They are
/// still real errors to maintenance commands, which is why they propagate
/// instead of being swallowed here.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}
