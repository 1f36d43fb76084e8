//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers all error cases that can occur
//! when fetching, parsing, or persisting daily price data.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, DNS, TLS, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing or coercing data received from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error creating or writing to a persistent store.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem error outside of a store (directory bootstrap, file writes).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl DataError {
    /// Returns true for errors raised by a store while creating or writing data.
    ///
    /// The pipeline logs these and carries on; every other kind ends the run.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
