//! Common error types used throughout vidshelf.
//!
//! This module provides a unified error type that covers the failure cases of
//! the catalog: missing entries, path conflicts, database errors, and I/O
//! failures.

/// Common error type for vidshelf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entry was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (e.g. a path is already cataloged).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Conflict error.
    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
