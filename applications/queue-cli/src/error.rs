/// CLI error types
use outertune_core::QueueId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Queue not found: {0}")]
    QueueNotFound(QueueId),

    #[error(transparent)]
    Storage(#[from] outertune_storage::StorageError),

    #[error(transparent)]
    Queue(#[from] outertune_queue::QueueError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
