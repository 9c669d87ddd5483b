//! DTOs for reading and updating mappings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_url;
use crate::domain::entities::Mapping;

/// A mapping as exposed over HTTP.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResponse {
    pub id: i64,
    pub short_code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub access_count: u64,
}

impl From<Mapping> for MappingResponse {
    fn from(mapping: Mapping) -> Self {
        Self {
            id: mapping.id,
            short_code: mapping.code,
            url: mapping.url,
            created_at: mapping.created_at,
            updated_at: mapping.updated_at,
            access_count: mapping.access_count,
        }
    }
}

/// Request body for `PUT /shorten/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMappingRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_url"))]
    pub url: String,
}
