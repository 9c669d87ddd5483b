//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`db_error`] - PostgreSQL error classification
//! - [`redirect_url`] - Checks on URLs before they are stored

pub mod code_generator;
pub mod db_error;
pub mod redirect_url;
