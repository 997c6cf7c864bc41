use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the user store and its backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document matched the identifier.
    #[error("user not found: {0}")]
    NotFound(String),

    /// The identifier is not a 24-character hex ObjectId.
    #[error("invalid user id: {0:?}")]
    InvalidId(String),

    /// The store could not be reached (connect, server selection, I/O).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not finish within its deadline.
    #[error("store operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// A stored document did not match the user shape.
    #[error("document decode error: {0}")]
    Decode(String),

    /// Backend selected in configuration is unusable.
    #[error("store configuration error: {0}")]
    Config(String),

    /// Any other driver failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }

    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }
}

#[cfg(feature = "backend-mongo")]
impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match e.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. } => StoreError::Unavailable(e.to_string()),
            ErrorKind::BsonDeserialization(_) => StoreError::Decode(e.to_string()),
            ErrorKind::InvalidArgument { .. } => StoreError::Config(e.to_string()),
            _ => StoreError::Backend(e.to_string()),
        }
    }
}
