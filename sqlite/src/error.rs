//! Error types for work order storage operations.
//!
//! Provides a unified error type covering input validation, missing records,
//! lifecycle violations, and database access failures.

use thiserror::Error;
use workorders_core::ValidationError;

/// Errors that can occur during work order storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected before reaching the database.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No work order has the requested id.
    #[error("work order #{0} not found")]
    NotFound(i64),

    /// The work order was already closed.
    #[error("work order #{0} is already closed")]
    AlreadyClosed(i64),

    /// SQLite database operation failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored row could not be converted into a work order.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Filesystem failure while preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for errors caused by the caller's request rather than
    /// by the storage engine.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::Validation(_) | StoreError::NotFound(_) | StoreError::AlreadyClosed(_)
        )
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
