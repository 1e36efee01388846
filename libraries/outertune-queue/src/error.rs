//! Error types for queue management

use outertune_core::CoreError;
use thiserror::Error;

/// Queue errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// No queue at this board index
    #[error("No queue at index {0}")]
    QueueNotFound(usize),

    /// Index outside a queue's track list
    #[error("Index {index} out of bounds for queue of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Operation needs at least one track
    #[error("Queue is empty")]
    QueueEmpty,

    /// Persistence requested outside a tokio runtime
    #[error("No tokio runtime available for persistence")]
    NoRuntime,

    /// Persistence is disabled for this board
    #[error("Persistence is not enabled")]
    PersistenceDisabled,

    /// Repository failure
    #[error(transparent)]
    Repository(#[from] CoreError),
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;

impl From<QueueError> for CoreError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Repository(inner) => inner,
            other => CoreError::Other(other.to_string()),
        }
    }
}
