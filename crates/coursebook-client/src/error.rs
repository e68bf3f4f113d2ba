//! Client error types.

/// Errors that can occur when using the coursebook client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a failure envelope.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the envelope.
        message: String,
    },

    /// Missing, expired or rejected token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller has no credits left to book with.
    #[error("no remaining credits")]
    NoRemainingCredits,

    /// The course has no free seats.
    #[error("course is full")]
    CourseFull,

    /// The caller already holds an active booking for the course.
    #[error("course already booked")]
    AlreadyBooked,

    /// An authenticated call was made without a token.
    #[error("not logged in")]
    NotLoggedIn,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Classify a failure envelope by status and message.
    pub(crate) fn from_failure(status: u16, message: String) -> Self {
        match (status, message.as_str()) {
            (401, _) => Self::Unauthorized(message),
            (400, "no remaining credits") => Self::NoRemainingCredits,
            (400, "course is full") => Self::CourseFull,
            (400, "course already booked") => Self::AlreadyBooked,
            _ => Self::Api { status, message },
        }
    }
}
