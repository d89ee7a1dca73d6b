//! Configuration management for ragline
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + explicit overrides)
//! - Type-safe configuration structs
//!
//! # Example
//!
//! ```no_run
//! use ragline_config::Config;
//!
//! // Load from default location (.ragline.{toml,yml,json})
//! let config = Config::load()?;
//!
//! // Or load from specific file
//! let config = Config::from_file("path/to/config.toml")?;
//!
//! let k = config.retrieval.top_k;
//! let max_new_tokens = config.generation.max_new_tokens;
//! # Ok::<(), ragline_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::*;

/// Main configuration struct aggregating all settings
pub use types::Config;

/// Trait for config validation
pub use validation::Validate;
