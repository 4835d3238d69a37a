/// Error types for Upload Service
///
/// Every failure in the request path ends up as an [`AppError`], which renders
/// as `{"message": ..., "error": <code>}`. Driver and SDK detail stays in the
/// logs; callers only ever see the category code.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::storage::StorageError;

/// Result type for upload-service operations
pub type Result<T> = std::result::Result<T, AppError>;

pub const UPLOAD_FAILED_MESSAGE: &str = "Error during upload";
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid upload request";

#[derive(Debug, Error)]
pub enum AppError {
    /// The multipart body carried no `image` part
    #[error("multipart field `image` is required")]
    MissingImage,

    /// The multipart body carried no `text` part
    #[error("multipart field `text` is required")]
    MissingText,

    #[error("Invalid multipart payload: {0}")]
    InvalidMultipart(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable category code returned to callers
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingImage => "missing_image",
            AppError::MissingText => "missing_text",
            AppError::InvalidMultipart(_) => "invalid_multipart",
            AppError::Storage(_) => "storage_error",
            AppError::Database(_) => "database_error",
            AppError::Config(_) | AppError::Internal(_) => "internal_error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// JSON body for failed requests
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    pub error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingImage | AppError::MissingText | AppError::InvalidMultipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Storage(_)
            | AppError::Database(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_client_error() {
            INVALID_REQUEST_MESSAGE
        } else {
            UPLOAD_FAILED_MESSAGE
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            message: message.to_string(),
            error: self.code().to_string(),
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}
