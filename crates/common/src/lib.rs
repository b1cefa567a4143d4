//! otio-rv Common Utilities
//!
//! Shared infrastructure for all otio-rv crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Environment configuration

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
