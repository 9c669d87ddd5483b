//! Repository trait for the mapping store.

use crate::domain::entities::{Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable, uniquely keyed storage of [`Mapping`]s.
///
/// The store exclusively owns persistence and concurrency control for
/// mappings. Every operation either fully commits or fully fails.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryMappingRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// All operations return [`AppError::StoreUnavailable`] when the backend cannot
/// be reached within the configured timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping with `access_count = 0`.
    ///
    /// The uniqueness check and the insert are a single atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is blank.
    /// Returns [`AppError::DuplicateCode`] if the code is already taken.
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, AppError>;

    /// Atomically increments `access_count` and returns the updated mapping.
    ///
    /// Concurrent calls for the same code never lose increments, and the
    /// increment is durable before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    async fn resolve_and_touch(&self, code: &str) -> Result<Mapping, AppError>;

    /// Replaces the URL and refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::Validation`] if the URL is blank.
    /// Returns [`AppError::Conflict`] if a concurrent transaction won the race.
    async fn update(&self, code: &str, url: &str) -> Result<Mapping, AppError>;

    /// Permanently removes a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown, including when it
    /// was already deleted.
    async fn delete(&self, code: &str) -> Result<(), AppError>;

    /// Fetches a mapping without touching its counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    async fn get(&self, code: &str) -> Result<Mapping, AppError>;

    /// Lists all mappings in insertion order.
    async fn list(&self) -> Result<Vec<Mapping>, AppError>;

    /// Returns whether a mapping with this code exists.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
