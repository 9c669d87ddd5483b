//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its URL and counts the access.
///
/// # Endpoint
///
/// `GET /shorten/{code}`
///
/// The stored URL is returned verbatim in `Location` with `302 Found`.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 Internal Server Error if the stored URL is not a valid header
/// value; such rows can only come from writes made outside this service.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mapping = state.mapping_service.resolve(&code).await?;
    debug!(code = %code, url = %mapping.url, "Redirecting");

    let location = HeaderValue::from_str(&mapping.url).map_err(|_| {
        AppError::internal(
            "Stored URL cannot be used as a redirect target",
            json!({ "code": code }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
