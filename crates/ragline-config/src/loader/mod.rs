//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Files probed by [`Config::load`], in order
pub const DEFAULT_CONFIG_FILES: [&str; 4] = [
    ".ragline.toml",
    ".ragline.yml",
    ".ragline.yaml",
    ".ragline.json",
];

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Complete config object; every field it holds wins
    Explicit(Config),
    /// Sparse tree of explicit overrides (CLI flags, programmatic tweaks)
    Overrides(Value),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides. Each
/// source contributes only the fields it actually sets, so a later source
/// may set a field back to its default value.
///
/// ```no_run
/// use ragline_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".ragline.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), ragline_config::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Apply only the fields present in `overrides`, e.g.
    /// `json!({ "retrieval": { "top_k": 3 } })`.
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.sources.push(ConfigSource::Overrides(overrides));
        self
    }

    /// Merge all sources in order (later wins) and validate the result.
    pub fn build(self) -> Result<Config> {
        let mut tree = merge::defaults()?;

        for source in self.sources {
            let layer = match source {
                ConfigSource::File(path) => file::load_layer(&path)?,
                ConfigSource::Environment => match env::from_env()? {
                    Some(layer) => layer,
                    None => continue,
                },
                ConfigSource::Explicit(explicit) => merge::to_tree(&explicit)?,
                ConfigSource::Overrides(layer) => layer,
            };
            merge::merge(&mut tree, layer);
        }

        let config = merge::into_config(tree)?;
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Load configuration from the first existing default file (see
    /// [`DEFAULT_CONFIG_FILES`]), falling back to defaults, then apply the
    /// environment overlay.
    pub fn load() -> Result<Self> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.with_file(path);
        }

        builder.with_env().build()
    }

    /// Load configuration from a specific file plus the environment overlay.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}
