//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use manager::ManagerError;
use serde::Serialize;
use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP server startup failed: {0}")]
    ServerStartup(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl WebServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::InternalError(_) | Self::ConfigError(_) | Self::ServerStartup(_) | Self::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ManagerError> for WebServerError {
    fn from(error: ManagerError) -> Self {
        let message = error.to_string();
        match error {
            ManagerError::NotFound { .. } | ManagerError::ProcessNotFound { .. } => Self::NotFound { message },
            ManagerError::Validation { .. } | ManagerError::Shared(_) => Self::BadRequest { message },
            ManagerError::Conflict { .. } => Self::Conflict { message },
            _ => Self::InternalError(message),
        }
    }
}

impl From<SharedError> for WebServerError {
    fn from(error: SharedError) -> Self {
        Self::BadRequest {
            message: error.to_string(),
        }
    }
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DeviceId;

    #[test]
    fn test_manager_errors_map_to_status_codes() {
        let not_found: WebServerError = ManagerError::NotFound {
            device_id: DeviceId::new(),
        }
        .into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid: WebServerError = ManagerError::validation("name", "is required").into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.to_string(), "Invalid name: is required");

        let conflict: WebServerError = ManagerError::Conflict {
            message: "ip_address taken".to_string(),
        }
        .into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let persistence: WebServerError = ManagerError::persistence("disk full").into();
        assert_eq!(persistence.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_shared_errors_are_bad_requests() {
        let error: WebServerError = SharedError::UnknownCategory {
            input: "thermal".to_string(),
        }
        .into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
