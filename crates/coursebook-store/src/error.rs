//! Error types for coursebook storage.

use coursebook_core::BookingRejection;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// The key that was looked up.
        id: String,
    },

    /// A uniqueness or state rule would be broken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The user already holds an active booking for the course.
    #[error("course already booked")]
    AlreadyBooked,

    /// The booking was refused by the credit/capacity policy.
    #[error(transparent)]
    Rejected(#[from] BookingRejection),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}
