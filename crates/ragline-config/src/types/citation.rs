//! Citation formatting configuration

use serde::{Deserialize, Serialize};

/// Fallback text used when a chunk lacks citation metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationConfig {
    /// Shown when a chunk has no `title`
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Shown when a chunk has neither `link` nor `source`
    #[serde(default = "default_link")]
    pub default_link: String,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            default_title: default_title(),
            default_link: default_link(),
        }
    }
}

impl crate::validation::Validate for CitationConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.default_title.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "citation.default_title".to_string(),
                message: "Fallback title cannot be blank".to_string(),
            });
        }
        if self.default_link.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "citation.default_link".to_string(),
                message: "Fallback link cannot be blank".to_string(),
            });
        }
        Ok(())
    }
}

fn default_title() -> String {
    "Unknown Title".to_string()
}

fn default_link() -> String {
    "No Link".to_string()
}
