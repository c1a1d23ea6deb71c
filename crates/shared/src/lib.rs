//! Shared library for the BGG tools workspace.
//!
//! This crate provides common functionality used by the binary crates:
//! - Configuration management
//! - Catalog data models
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ConfigSource};
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
