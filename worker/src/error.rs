//! Worker error types

use thiserror::Error;

/// Result type for worker operations
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Worker error types
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Event source fault: {message}")]
    SourceFault { message: String },

    #[error("Ingestion channel closed")]
    ChannelClosed,

    #[error("Invalid worker configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Failed to spawn worker: {reason}")]
    SpawnFailed { reason: String },

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl WorkerError {
    pub fn source_fault(message: impl Into<String>) -> Self {
        Self::SourceFault { message: message.into() }
    }
}
