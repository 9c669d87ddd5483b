//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, input checks and retry policy, and
//! give HTTP handlers and the admin CLI a single API to call.
//!
//! # Available Services
//!
//! - [`services::mapping_service::MappingService`] - Short code allocation,
//!   resolution and maintenance

pub mod services;
