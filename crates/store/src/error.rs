//! Store error types.

use thiserror::Error;

/// Errors that can occur when interacting with the object or record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store backend rejected or failed an operation.
    #[error("Store backend error during {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// A persisted record could not be read back into its typed form.
    #[error("Malformed record in store: {0}")]
    MalformedRecord(String),
}

impl StoreError {
    /// Wraps a backend failure with the name of the failed operation.
    pub fn backend(operation: &'static str, source: impl std::fmt::Display) -> Self {
        Self::Backend {
            operation,
            message: source.to_string(),
        }
    }
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
