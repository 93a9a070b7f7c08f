//! Error types for the library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 1,
    InvalidData = 2,
    NullArgument = 3,
    NotFound = 4,
    AlreadyExists = 5,
    CannotChangeIdentity = 6,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Missing argument: {0}")]
    NullArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Cannot change identity: {0}")]
    CannotChangeIdentity(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl AppError {
    /// Error code reported to clients for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidData(_) => ErrorCode::InvalidData,
            AppError::NullArgument(_) => ErrorCode::NullArgument,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            AppError::CannotChangeIdentity(_) => ErrorCode::CannotChangeIdentity,
            AppError::Database(_) => ErrorCode::DbFailure,
        }
    }

    /// HTTP status for this error. Anything without a dedicated mapping is a 400.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Unique indexes back the repository checks; a violation that slips
        // through is still a duplicate, not a storage failure.
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return AppError::AlreadyExists(db_err.message().to_string());
            }
        }
        AppError::Database(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidData(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::InvalidData(msg)
            | AppError::NullArgument(msg)
            | AppError::NotFound(msg)
            | AppError::AlreadyExists(msg)
            | AppError::CannotChangeIdentity(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
