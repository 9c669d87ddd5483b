//! Handler for per-mapping statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::mapping::MappingResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a mapping with its access count, without counting an access.
///
/// # Endpoint
///
/// `GET /shorten/{code}/stats`
///
/// # Response
///
/// ```json
/// {
///   "id": 1,
///   "shortCode": "3fa9c1",
///   "url": "https://example.com",
///   "createdAt": "2025-01-01T10:00:00Z",
///   "updatedAt": "2025-01-01T10:00:00Z",
///   "accessCount": 42
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MappingResponse>, AppError> {
    let mapping = state.mapping_service.stats(&code).await?;
    Ok(Json(mapping.into()))
}
