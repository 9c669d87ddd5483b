//! In-process implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::redirect_url::ensure_redirect_url;

/// Mapping store backed by a [`DashMap`].
///
/// Sharded locks let operations on different codes proceed in parallel, while
/// every read-modify-write on one code runs under that shard's write lock. Data
/// lives only as long as the process.
#[derive(Debug)]
pub struct MemoryMappingRepository {
    storage: DashMap<String, Mapping>,
    next_id: AtomicI64,
}

impl MemoryMappingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemoryMappingRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Mapping not found", json!({ "code": code }))
}

#[async_trait]
impl MappingRepository for MemoryMappingRepository {
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        ensure_redirect_url(&new_mapping.url)?;

        match self.storage.entry(new_mapping.code) {
            Entry::Occupied(occupied) => Err(AppError::duplicate_code(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                let now = Utc::now();
                let mapping = Mapping::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed),
                    vacant.key().clone(),
                    new_mapping.url,
                    now,
                    now,
                    0,
                );
                vacant.insert(mapping.clone());
                Ok(mapping)
            }
        }
    }

    async fn resolve_and_touch(&self, code: &str) -> Result<Mapping, AppError> {
        let mut entry = self.storage.get_mut(code).ok_or_else(|| not_found(code))?;
        entry.access_count += 1;
        Ok(entry.clone())
    }

    async fn update(&self, code: &str, url: &str) -> Result<Mapping, AppError> {
        ensure_redirect_url(url)?;

        let mut entry = self.storage.get_mut(code).ok_or_else(|| not_found(code))?;
        entry.url = url.to_string();
        entry.updated_at = Utc::now().max(entry.created_at);
        Ok(entry.clone())
    }

    async fn delete(&self, code: &str) -> Result<(), AppError> {
        self.storage
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| not_found(code))
    }

    async fn get(&self, code: &str) -> Result<Mapping, AppError> {
        self.storage
            .get(code)
            .map(|entry| entry.clone())
            .ok_or_else(|| not_found(code))
    }

    async fn list(&self) -> Result<Vec<Mapping>, AppError> {
        let mut mappings: Vec<Mapping> = self
            .storage
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        mappings.sort_by_key(|m| m.id);
        Ok(mappings)
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.storage.contains_key(code))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
