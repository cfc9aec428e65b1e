//! Parsing and validation of `sldroute.toml` routing configuration.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`EngineConfig`]: routing constraints, optimizer settings, style thresholds,
//! and history log sizing. Every field has a documented default, so an empty
//! file (or no file at all) yields a usable configuration.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config, CONFIG_FILE_NAME};
pub use types::*;
