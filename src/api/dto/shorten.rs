//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_url;

/// Request to shorten a single URL.
///
/// A missing `url` field deserializes to an empty string so that it is
/// reported by validation like a blank one.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_url"))]
    pub url: String,
}

/// Response for a newly created mapping.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
}
