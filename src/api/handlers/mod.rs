//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod mappings;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use health::health_handler;
pub use mappings::{delete_handler, list_handler, update_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::stats_handler;

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::json;

use crate::error::AppError;

/// Unwraps a JSON body, reporting malformed input as a validation error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::bad_request(
            "Invalid JSON body",
            json!({ "reason": rejection.body_text() }),
        )),
    }
}
