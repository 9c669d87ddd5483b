//! Checks applied to URLs before they are stored.
//!
//! A stored URL is sent back verbatim in the `Location` header of a redirect,
//! so it must be a valid header value. Rejecting it on write keeps a redirect
//! from counting an access it cannot serve.

use axum::http::HeaderValue;
use serde_json::json;

use crate::error::AppError;

/// Returns true if `url` can be used as a `Location` header value.
pub fn is_header_safe(url: &str) -> bool {
    HeaderValue::from_str(url).is_ok()
}

/// Rejects blank URLs and URLs that cannot be redirected to.
///
/// # Errors
///
/// Returns [`AppError::Validation`] in both cases.
pub fn ensure_redirect_url(url: &str) -> Result<(), AppError> {
    if url.trim().is_empty() {
        return Err(AppError::bad_request(
            "URL cannot be empty",
            json!({ "field": "url" }),
        ));
    }
    if !is_header_safe(url) {
        return Err(AppError::bad_request(
            "URL contains characters not allowed in a redirect",
            json!({ "field": "url" }),
        ));
    }
    Ok(())
}
