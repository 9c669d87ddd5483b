//! Application error type shared by every layer.
//!
//! Repositories, services and handlers all return [`AppError`]. The HTTP layer
//! renders it through [`IntoResponse`] as:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "not_found",
//!     "message": "Mapping not found",
//!     "details": { "code": "abc123" }
//!   }
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::utils::db_error::{is_serialization_failure, is_unique_violation};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input, e.g. a blank URL.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown short code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The proposed short code is already taken by a live mapping.
    #[error("short code already taken: {code}")]
    DuplicateCode { code: String },

    /// A concurrent mutation won the race.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Every generated code collided.
    #[error("failed to allocate a unique short code after {attempts} attempts")]
    GenerationFailure { attempts: u32 },

    /// The store timed out or could not be reached.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::DuplicateCode { code: code.into() }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateCode { .. } | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GenerationFailure { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            AppError::Validation { details, .. } => ("validation_error", details.clone()),
            AppError::NotFound { details, .. } => ("not_found", details.clone()),
            AppError::DuplicateCode { code } => ("duplicate_code", json!({ "code": code })),
            AppError::Conflict { details, .. } => ("conflict", details.clone()),
            AppError::GenerationFailure { attempts } => {
                ("generation_failure", json!({ "attempts": attempts }))
            }
            AppError::StoreUnavailable { details, .. } => ("store_unavailable", details.clone()),
            AppError::Internal { details, .. } => ("internal_error", details.clone()),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!(e))
    }
}

/// Classifies a database error.
///
/// Unique violations and serialization failures become [`AppError::Conflict`];
/// connectivity problems become [`AppError::StoreUnavailable`]. Anything else is
/// logged and reported as an opaque internal error.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        let constraint = e
            .as_database_error()
            .and_then(|db| db.constraint().map(str::to_owned));
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": constraint }),
        );
    }

    if is_serialization_failure(&e) {
        return AppError::conflict("Concurrent modification detected", json!({}));
    }

    match &e {
        sqlx::Error::PoolTimedOut => {
            AppError::store_unavailable("Timed out acquiring a database connection", json!({}))
        }
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => {
            tracing::warn!(error = %e, "Database unreachable");
            AppError::store_unavailable("Database unavailable", json!({}))
        }
        _ => {
            tracing::error!(error = %e, "Database error");
            AppError::internal("Database error", json!({}))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::duplicate_code("abc123").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::conflict("x", json!({})).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::store_unavailable("x", json!({})).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::GenerationFailure { attempts: 5 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_info_carries_code_and_message() {
        let info = AppError::not_found("Mapping not found", json!({ "code": "abc123" }))
            .to_error_info();

        assert_eq!(info.code, "not_found");
        assert_eq!(info.message, "Mapping not found");
        assert_eq!(info.details["code"], "abc123");
    }

    #[test]
    fn test_generation_failure_message() {
        let err = AppError::GenerationFailure { attempts: 3 };
        assert!(err.to_string().contains("3 attempts"));
        assert_eq!(err.to_error_info().details["attempts"], 3);
    }

    #[test]
    fn test_pool_timeout_maps_to_store_unavailable() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_row_not_found_maps_to_internal() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
