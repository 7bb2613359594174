use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::uploads::UploadError;

/// JSON error body returned by every failing endpoint: `{error, details?}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    FileTooLarge,
    Internal {
        message: String,
        details: Option<String>,
    },
}

impl AppError {
    /// Internal failure whose body carries only the public message.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
            details: None,
        }
    }

    /// Internal failure that echoes the underlying error text as `details`.
    pub fn internal_with(message: impl Into<String>, source: impl ToString) -> Self {
        AppError::Internal {
            message: message.into(),
            details: Some(source.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::FileTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "File exceeds the 5 MiB limit".to_string(),
                None,
            ),
            AppError::Internal { message, details } => {
                tracing::error!(error = %message, details = ?details, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, message, details)
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::internal_with("Internal server error", err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::internal_with("Database error", err),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedFileType { .. } => AppError::BadRequest(err.to_string()),
            UploadError::FileTooLarge => AppError::FileTooLarge,
            UploadError::Io(io) => AppError::internal_with("Failed to store uploaded file", io),
        }
    }
}
