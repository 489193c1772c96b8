//! Error handling module
//!
//! Boundary error taxonomy and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::ValidationError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Machine-distinguishable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Unexpected,
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Request breaks a business rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage failure; the message never carries backend detail
    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn account_not_found() -> Self {
        Self::NotFound("account id provided was not found in database".to_string())
    }

    pub fn customer_not_found() -> Self {
        Self::NotFound("customer not found".to_string())
    }

    pub fn storage_timeout() -> Self {
        tracing::error!("Storage operation timed out; unit of work aborted");
        Self::Unexpected("unexpected database error: operation timed out".to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Storage error");
        Self::Unexpected(format!("unexpected database error while {}", err.operation()))
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            // 404 Not Found
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),

            // 422 Unprocessable Entity
            AppError::Validation(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.code()),

            // 500 Internal Server Error
            AppError::Unexpected(_) => (StatusCode::INTERNAL_SERVER_ERROR, "unexpected_error"),
        };

        let body = ErrorResponse {
            error_code: error_code.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::account_not_found(), StatusCode::NOT_FOUND),
            (
                AppError::Validation(ValidationError::InsufficientFunds),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Unexpected("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_error_hides_backend_detail() {
        let store_err = StoreError::Database {
            operation: "committing the transaction",
            source: sqlx::Error::PoolTimedOut,
        };

        let err = AppError::from(store_err);
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(
            err.to_string(),
            "unexpected database error while committing the transaction"
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = AppError::from(ValidationError::InvalidTransactionKind);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "error: transaction type must be either withdrawal or deposit"
        );
    }
}
