//! Mapping entity: a short code and the URL it resolves to.

use chrono::{DateTime, Utc};

/// A stored short code → URL mapping.
///
/// `access_count` only ever grows and `updated_at` never precedes `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: i64,
    pub code: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub access_count: u64,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(
        id: i64,
        code: String,
        url: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        access_count: u64,
    ) -> Self {
        Self {
            id,
            code,
            url,
            created_at,
            updated_at,
            access_count,
        }
    }
}

/// Input data for creating a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub code: String,
    pub url: String,
}

impl NewMapping {
    pub fn new(code: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            url: url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let now = Utc::now();
        let mapping = Mapping::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
            now,
            0,
        );

        assert_eq!(mapping.id, 1);
        assert_eq!(mapping.code, "abc123");
        assert_eq!(mapping.url, "https://example.com");
        assert_eq!(mapping.access_count, 0);
        assert_eq!(mapping.created_at, mapping.updated_at);
    }

    #[test]
    fn test_new_mapping_creation() {
        let new_mapping = NewMapping::new("xyz789", "https://rust-lang.org");

        assert_eq!(new_mapping.code, "xyz789");
        assert_eq!(new_mapping.url, "https://rust-lang.org");
    }
}
