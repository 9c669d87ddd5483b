//! Domain layer: entities and the storage contract.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependency on the infrastructure or API layers;
//! repository traits are implemented in [`crate::infrastructure::persistence`].

pub mod entities;
pub mod repositories;
