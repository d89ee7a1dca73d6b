//! Embedding provider configuration

use serde::{Deserialize, Serialize};

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Embedding backend to use
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name for the selected backend
    ///
    /// Examples:
    /// - OpenAI: "text-embedding-3-small", "text-embedding-3-large"
    /// - Ollama: "all-minilm", "nomic-embed-text"
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Optional API base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Number of texts sent per backend request when encoding the corpus
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Per-call deadline in seconds; a call exceeding it is cancelled (0 = no deadline)
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Embedding backend options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI-compatible API (requires OPENAI_API_KEY)
    #[serde(rename = "openai")]
    OpenAi,

    /// Local Ollama server
    #[default]
    Ollama,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model_name: default_model_name(),
            api_base: None,
            batch_size: default_batch_size(),
            timeout_secs: 0,
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.model_name.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "embedding.model_name".to_string(),
                message: "Model name cannot be empty".to_string(),
            });
        }

        crate::validation::validate_positive("embedding.batch_size", self.batch_size, 0)?;

        if let Some(api_base) = &self.api_base {
            crate::validation::validate_url("embedding.api_base", api_base)?;
        }

        Ok(())
    }
}

fn default_model_name() -> String {
    "all-minilm".to_string()
}

fn default_batch_size() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = EmbeddingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend, EmbeddingBackend::Ollama);
    }

    #[test]
    fn test_empty_model_name_invalid() {
        let config = EmbeddingConfig {
            model_name: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_batch_size_invalid() {
        let config = EmbeddingConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_serialization() {
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::OpenAi).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::Ollama).unwrap(),
            "\"ollama\""
        );
    }
}
