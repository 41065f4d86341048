//! Error types for the Stacks server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable application error codes surfaced in API responses.
///
/// Codes are part of the wire contract: callers match on them to render
/// actionable messages, so existing values must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    StoreFailure = 2,
    PatronNotFound = 3,
    BookNotFound = 4,
    LoanNotFound = 5,
    PatronInactive = 6,
    BorrowLimitExceeded = 7,
    BookUnavailable = 8,
    NoActiveLoan = 9,
    DuplicateActiveLoan = 10,
    LoanAlreadyClosed = 11,
    Duplicate = 12,
    BadValue = 13,
    ReconciliationRequired = 14,
    InvariantViolation = 15,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Patron {0} not found")]
    PatronNotFound(i32),

    #[error("Book {0} not found")]
    BookNotFound(String),

    #[error("Loan {0} not found")]
    LoanNotFound(i64),

    #[error("Patron {0} is inactive and may not borrow")]
    PatronInactive(i32),

    #[error("Borrowing limit reached: max {max} books ({current} active)")]
    BorrowLimitExceeded { current: i64, max: i64 },

    #[error("No copies of {0} are currently available")]
    BookUnavailable(String),

    #[error("Patron {patron_id} has no active loan for {isbn}")]
    NoActiveLoan { patron_id: i32, isbn: String },

    #[error("Patron {patron_id} already has an active loan for {isbn}")]
    DuplicateActiveLoan { patron_id: i32, isbn: String },

    #[error("Loan {0} is already closed")]
    LoanAlreadyClosed(i64),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Reconciliation required: {0}")]
    ReconciliationRequired(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl AppError {
    /// The stable code this error is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::PatronNotFound(_) => ErrorCode::PatronNotFound,
            AppError::BookNotFound(_) => ErrorCode::BookNotFound,
            AppError::LoanNotFound(_) => ErrorCode::LoanNotFound,
            AppError::PatronInactive(_) => ErrorCode::PatronInactive,
            AppError::BorrowLimitExceeded { .. } => ErrorCode::BorrowLimitExceeded,
            AppError::BookUnavailable(_) => ErrorCode::BookUnavailable,
            AppError::NoActiveLoan { .. } => ErrorCode::NoActiveLoan,
            AppError::DuplicateActiveLoan { .. } => ErrorCode::DuplicateActiveLoan,
            AppError::LoanAlreadyClosed(_) => ErrorCode::LoanAlreadyClosed,
            AppError::Conflict(_) => ErrorCode::Duplicate,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Database(_) => ErrorCode::StoreFailure,
            AppError::ReconciliationRequired(_) => ErrorCode::ReconciliationRequired,
            AppError::InvariantViolation(_) => ErrorCode::InvariantViolation,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
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
        let (status, message) = match &self {
            AppError::PatronNotFound(_)
            | AppError::BookNotFound(_)
            | AppError::LoanNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),

            // Business-rule rejections, not system failures.
            AppError::PatronInactive(_)
            | AppError::BorrowLimitExceeded { .. }
            | AppError::BookUnavailable(_)
            | AppError::NoActiveLoan { .. }
            | AppError::DuplicateActiveLoan { .. }
            | AppError::LoanAlreadyClosed(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }

            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::ReconciliationRequired(msg) => {
                tracing::error!("Reconciliation required: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::InvariantViolation(msg) => {
                tracing::error!("Invariant violation: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorCode::PatronNotFound as u32, 3);
        assert_eq!(ErrorCode::BorrowLimitExceeded as u32, 7);
        assert_eq!(ErrorCode::BookUnavailable as u32, 8);
        assert_eq!(ErrorCode::ReconciliationRequired as u32, 14);
    }

    #[test]
    fn precondition_failures_carry_distinct_codes() {
        let errors = [
            AppError::PatronInactive(1),
            AppError::BorrowLimitExceeded { current: 3, max: 3 },
            AppError::BookUnavailable("978-0".into()),
            AppError::NoActiveLoan {
                patron_id: 1,
                isbn: "978-0".into(),
            },
            AppError::DuplicateActiveLoan {
                patron_id: 1,
                isbn: "978-0".into(),
            },
            AppError::LoanAlreadyClosed(7),
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code() as u32).collect();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn limit_message_is_actionable() {
        let err = AppError::BorrowLimitExceeded { current: 3, max: 3 };
        assert_eq!(
            err.to_string(),
            "Borrowing limit reached: max 3 books (3 active)"
        );
    }
}
