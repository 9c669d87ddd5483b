//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use super::json_body;
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short code for a URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// `201 Created` with a `Location` header pointing at the short URL:
///
/// ```json
/// {
///   "shortUrl": "http://localhost:3000/shorten/3fa9c1",
///   "shortCode": "3fa9c1"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or the URL is blank.
/// Returns 500 Internal Server Error if no free code was found.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(payload)?;
    payload.validate()?;

    let mapping = state.mapping_service.shorten(&payload.url).await?;
    let short_url = state
        .mapping_service
        .short_url(&state.base_url, &mapping.code);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, short_url.clone())],
        Json(ShortenResponse {
            short_url,
            short_code: mapping.code,
        }),
    ))
}
