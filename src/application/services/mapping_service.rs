//! Mapping creation, resolution and maintenance service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::redirect_url::ensure_redirect_url;

/// Default number of codes tried before giving up on a shorten request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Service orchestrating the code generator and the mapping store.
///
/// Owns the collision retry loop: the generator never checks uniqueness, the
/// store's constraint reports collisions, and this service retries with a
/// fresh code.
pub struct MappingService<R: MappingRepository + ?Sized, G: CodeGenerator + ?Sized> {
    repository: Arc<R>,
    generator: Arc<G>,
    max_attempts: u32,
}

impl<R: MappingRepository + ?Sized, G: CodeGenerator + ?Sized> MappingService<R, G> {
    /// Creates a new mapping service.
    pub fn new(repository: Arc<R>, generator: Arc<G>) -> Self {
        Self {
            repository,
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets how many codes are tried per shorten request (at least one).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Shortens a URL.
    ///
    /// The same URL may be shortened any number of times; each call gets its
    /// own code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is blank or cannot be
    /// redirected to.
    /// Returns [`AppError::GenerationFailure`] if every attempt collided.
    pub async fn shorten(&self, url: &str) -> Result<Mapping, AppError> {
        ensure_redirect_url(url)?;

        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate(url);

            match self.repository.create(NewMapping::new(code, url)).await {
                Ok(mapping) => {
                    info!(code = %mapping.code, attempt, "Mapping created");
                    return Ok(mapping);
                }
                Err(AppError::DuplicateCode { code }) => {
                    warn!(code = %code, attempt, "Short code collision, regenerating");
                    metrics::counter!("shortener_code_collisions_total").increment(1);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(attempts = self.max_attempts, "Giving up on short code allocation");
        metrics::counter!("shortener_generation_failures_total").increment(1);
        Err(AppError::GenerationFailure {
            attempts: self.max_attempts,
        })
    }

    /// Resolves a code to its mapping, counting the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn resolve(&self, code: &str) -> Result<Mapping, AppError> {
        let mapping = self.repository.resolve_and_touch(code).await?;
        debug!(code, access_count = mapping.access_count, "Mapping resolved");
        Ok(mapping)
    }

    /// Returns a mapping without counting an access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn stats(&self, code: &str) -> Result<Mapping, AppError> {
        self.repository.get(code).await
    }

    /// Points an existing code at a new URL.
    ///
    /// On a concurrent-modification conflict the code's existence is checked
    /// again: if it vanished (a racing delete) the result is `NotFound`,
    /// otherwise the conflict is returned for the caller to retry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the code is blank or the URL is
    /// blank or cannot be redirected to.
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::Conflict`] if a concurrent update won the race.
    pub async fn update(&self, code: &str, url: &str) -> Result<Mapping, AppError> {
        ensure_not_blank("code", code)?;
        ensure_redirect_url(url)?;

        match self.repository.update(code, url).await {
            Ok(mapping) => {
                info!(code, "Mapping updated");
                Ok(mapping)
            }
            Err(conflict @ AppError::Conflict { .. }) => {
                if self.repository.exists(code).await? {
                    warn!(code, "Update lost a concurrent modification race");
                    Err(conflict)
                } else {
                    Err(AppError::not_found(
                        "Mapping not found",
                        json!({ "code": code }),
                    ))
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Permanently deletes a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        self.repository.delete(code).await?;
        info!(code, "Mapping deleted");
        Ok(())
    }

    /// Lists every mapping.
    pub async fn list(&self) -> Result<Vec<Mapping>, AppError> {
        self.repository.list().await
    }

    /// Checks the store's liveness.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/shorten/{}", base_url.trim_end_matches('/'), code)
    }
}

fn ensure_not_blank(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(
            format!("{field} cannot be empty"),
            json!({ "field": field }),
        ));
    }
    Ok(())
}
