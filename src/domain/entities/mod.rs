//! Core domain entities.
//!
//! - [`Mapping`] - A stored short code → URL mapping
//! - [`NewMapping`] - Input for creating a mapping

pub mod mapping;

pub use mapping::{Mapping, NewMapping};
