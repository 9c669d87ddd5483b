//! Handlers for listing, updating and deleting mappings.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use super::json_body;
use crate::api::dto::mapping::{MappingResponse, UpdateMappingRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every mapping in creation order.
///
/// # Endpoint
///
/// `GET /shorten`
///
/// An empty store yields `200 OK` with `[]`.
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<MappingResponse>>, AppError> {
    let mappings = state.mapping_service.list().await?;
    Ok(Json(mappings.into_iter().map(Into::into).collect()))
}

/// Points an existing short code at a new URL.
///
/// # Endpoint
///
/// `PUT /shorten/{code}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.org" }
/// ```
///
/// # Errors
///
/// - 400 Bad Request - malformed body or blank URL
/// - 404 Not Found - unknown code
/// - 409 Conflict - a concurrent update won; retry
pub async fn update_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateMappingRequest>, JsonRejection>,
) -> Result<Json<MappingResponse>, AppError> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let mapping = state.mapping_service.update(&code, &payload.url).await?;
    Ok(Json(mapping.into()))
}

/// Permanently deletes a mapping.
///
/// # Endpoint
///
/// `DELETE /shorten/{code}`
///
/// Returns `204 No Content`; the code becomes free for reuse.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn delete_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.mapping_service.delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
