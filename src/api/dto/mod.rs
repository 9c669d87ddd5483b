//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod health;
pub mod mapping;
pub mod shorten;

use validator::ValidationError;

use crate::utils::redirect_url::is_header_safe;

/// Rejects blank URLs and URLs that cannot be sent back in a `Location` header.
pub(crate) fn validate_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("URL cannot be empty".into()));
    }
    if !is_header_safe(value) {
        return Err(ValidationError::new("invalid_characters")
            .with_message("URL contains characters not allowed in a redirect".into()));
    }
    Ok(())
}
