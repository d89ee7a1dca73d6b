//! TOML format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

/// Parse with the source path included in error messages
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    ::toml::from_str(content).map_err(|e| ConfigError::from_toml_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerationBackend;

    #[test]
    fn test_parse_sections() {
        let toml = r#"
[retrieval]
top_k = 5

[generation]
backend = "openai"
model = "gpt-4o-mini"

[generation.options]
num_ctx = 4096
"#;
        let config = parse(toml).unwrap();
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.generation.backend, GenerationBackend::OpenAi);
        assert_eq!(config.generation.options["num_ctx"], serde_json::json!(4096));
        assert_eq!(config.evaluation.top_k, 4);
    }
}
