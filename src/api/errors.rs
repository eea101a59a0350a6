//! # API Errors
//!
//! Every request failure ends up here. Client errors are returned as-is;
//! server errors are logged before the response is built.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::cache::CacheError;
use crate::observability::{Event, Logger};
use crate::person::ValidationError;
use crate::storage::StorageError;

/// Result type for request handling
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Missing required query parameter
    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    /// Body is not a JSON person
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Body decoded but a field is invalid
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No person with that identifier
    #[error("Person not found")]
    NotFound,

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Storage failure: {0}")]
    Storage(StorageError),

    #[error("Cache failure: {0}")]
    Cache(#[from] CacheError),

    /// Request deadline passed while waiting on a backend
    #[error("Deadline exceeded waiting for {0}")]
    DeadlineExceeded(&'static str),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) | ApiError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Cache(_) | ApiError::DeadlineExceeded(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingParam(_) => "MISSING_PARAM",
            ApiError::InvalidBody(_) => "INVALID_BODY",
            ApiError::Validation(ValidationError::InvalidBirthdate) => "INVALID_BIRTHDATE",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Storage(err) => err.code(),
            ApiError::Cache(err) => err.code(),
            ApiError::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);

        if status.is_server_error() {
            Logger::error(
                Event::RequestFailed.as_str(),
                &[
                    ("code", self.code()),
                    ("error", body.error.as_str()),
                    ("status", status.as_str()),
                ],
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingParam("t").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ValidationError::InvalidBirthdate).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::DeadlineExceeded("storage").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_not_found_becomes_404() {
        let err = ApiError::from(StorageError::NotFound);
        assert!(matches!(err, ApiError::NotFound));

        let err = ApiError::from(StorageError::Poisoned);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "STORAGE_LOCK_POISONED");
    }

    #[test]
    fn test_error_body() {
        let body = ErrorResponse::from(&ApiError::MissingParam("t"));
        assert_eq!(body.code, 400);
        assert_eq!(body.error, "Missing required parameter: t");
    }
}
