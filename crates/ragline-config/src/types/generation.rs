//! Text generation configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generation backend options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    /// OpenAI-compatible chat completions API (requires OPENAI_API_KEY)
    #[serde(rename = "openai")]
    OpenAi,

    /// Local Ollama server
    #[default]
    Ollama,
}

/// Generator configuration
///
/// Decoding is always greedy: `temperature` is kept in the file format so the
/// value sent to the backend is explicit, but anything other than `0.0` is
/// rejected by validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Generation backend to use
    #[serde(default)]
    pub backend: GenerationBackend,

    /// Model name
    ///
    /// Examples: "mistral", "llama3.1:8b", "gpt-4o-mini"
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional API base URL override
    ///
    /// Use this to point to alternative OpenAI-compatible endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Upper bound on generated tokens
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    /// Sampling temperature sent to the backend (must be 0.0)
    #[serde(default)]
    pub temperature: f32,

    /// Marker after which the answer continuation starts
    #[serde(default = "default_answer_marker")]
    pub answer_marker: String,

    /// Prompts longer than this many characters keep only their tail (0 = never truncate)
    #[serde(default = "default_max_prompt_chars")]
    pub max_prompt_chars: usize,

    /// Per-call deadline in seconds; a call exceeding it is cancelled (0 = no deadline)
    #[serde(default)]
    pub timeout_secs: u64,

    /// Backend-specific parameters passed through untouched
    /// (quantization, context window, seed, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::default(),
            model: default_model(),
            api_base: None,
            max_new_tokens: default_max_new_tokens(),
            temperature: 0.0,
            answer_marker: default_answer_marker(),
            max_prompt_chars: default_max_prompt_chars(),
            timeout_secs: 0,
            options: BTreeMap::new(),
        }
    }
}

impl crate::validation::Validate for GenerationConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.model.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "generation.model".to_string(),
                message: "Model name cannot be empty".to_string(),
            });
        }

        if self.max_new_tokens == 0 {
            return Err(ConfigError::ValidationError {
                field: "generation.max_new_tokens".to_string(),
                message: "max_new_tokens must be > 0".to_string(),
            });
        }

        crate::validation::validate_range("generation.temperature", self.temperature, 0.0, 0.0)?;

        if self.answer_marker.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "generation.answer_marker".to_string(),
                message: "Answer marker cannot be blank".to_string(),
            });
        }

        if let Some(api_base) = &self.api_base {
            crate::validation::validate_url("generation.api_base", api_base)?;
        }

        Ok(())
    }
}

fn default_model() -> String {
    "mistral".to_string()
}

fn default_max_new_tokens() -> u32 {
    100
}

fn default_answer_marker() -> String {
    "Answer:".to_string()
}

fn default_max_prompt_chars() -> usize {
    12_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_new_tokens, 100);
        assert_eq!(config.answer_marker, "Answer:");
    }

    #[test]
    fn test_empty_model_invalid() {
        let config = GenerationConfig {
            model: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_new_tokens_invalid() {
        let config = GenerationConfig {
            max_new_tokens: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sampling_temperature_rejected() {
        let config = GenerationConfig {
            temperature: 0.7,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { max, .. }) if max == 0.0
        ));
    }

    #[test]
    fn test_invalid_api_base() {
        let config = GenerationConfig {
            api_base: Some("not-a-url".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_api_base() {
        let config = GenerationConfig {
            api_base: Some("https://api.openai.com/v1".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
