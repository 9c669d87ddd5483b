//! Mapping store implementations.
//!
//! - [`PgMappingRepository`] - PostgreSQL, runtime-checked SQLx queries
//! - [`MemoryMappingRepository`] - In-process store for tests and local runs

pub mod memory_mapping_repository;
pub mod pg_mapping_repository;

pub use memory_mapping_repository::MemoryMappingRepository;
pub use pg_mapping_repository::PgMappingRepository;
