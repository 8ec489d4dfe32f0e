//! Error types shared across the core library.

use thiserror::Error;

/// Convenience alias used throughout the store layer.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures reported by a [`crate::store::UserStore`].
///
/// `Validation` and `Conflict` carry messages safe to show to clients.
/// `Database` wraps whatever the driver reported and must never reach a
/// client verbatim; callers log it and answer with a generic message.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The targeted record does not exist (or vanished mid-operation).
    #[error("user not found")]
    NotFound,

    /// A column constraint rejected the submitted values.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness constraint rejected the submitted values.
    #[error("{0}")]
    Conflict(String),

    /// Any other driver failure. Not safe to expose.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// True when the message is safe to echo back to the client.
    pub fn is_client_safe(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Conflict(_))
    }
}
