//! Buffer store error types.

use thiserror::Error;

/// Result type for buffer store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing buffers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
