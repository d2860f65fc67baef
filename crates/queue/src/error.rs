//! Queue error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue backend rejected or failed an operation.
    #[error("Queue backend error during {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// Acked or nacked a message that is not in flight.
    #[error("Message {0} is not in flight")]
    NotInFlight(Uuid),

    /// A task handler failed to process a message.
    #[error("Task failed: {0}")]
    Handler(String),
}

/// Convenience type alias for queue results.
pub type Result<T> = std::result::Result<T, QueueError>;
