//! Manager-specific error types

use shared::{DeviceId, ProcessId, SharedError};
use thiserror::Error;
use worker::WorkerError;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Device not found: {device_id}")]
    NotFound { device_id: DeviceId },

    #[error("Process record not found: {process_id}")]
    ProcessNotFound { process_id: ProcessId },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Failed to spawn worker for device {device_id}: {reason}")]
    SpawnFailed { device_id: DeviceId, reason: String },

    #[error("Persistence failure: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),
}

impl ManagerError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence { message: message.into() }
    }

    pub fn config(field: impl Into<String>) -> Self {
        Self::ConfigurationError { field: field.into() }
    }

    /// Non-retriable errors that should be surfaced to callers as-is
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ProcessNotFound { .. })
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
