//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::MappingService;
use crate::domain::repositories::MappingRepository;
use crate::utils::code_generator::CodeGenerator;

/// Mapping service over type-erased store and generator.
pub type SharedMappingService = MappingService<dyn MappingRepository, dyn CodeGenerator>;

#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<SharedMappingService>,
    /// Public prefix of generated short URLs, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        generator: Arc<dyn CodeGenerator>,
        max_attempts: u32,
        base_url: impl Into<String>,
    ) -> Self {
        let mapping_service =
            MappingService::new(repository, generator).with_max_attempts(max_attempts);

        Self {
            mapping_service: Arc::new(mapping_service),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}
