//! JSON format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

/// Parse with the source path included in error messages
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    serde_json::from_str(content).map_err(|e| ConfigError::from_json_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricKind;

    #[test]
    fn test_parse_evaluation_section() {
        let json = r#" {
            "evaluation": {
                "top_k": 2,
                "metrics": ["token_f1", "exact_match"]
            }
        }"#;
        let config = parse(json).unwrap();
        assert_eq!(config.evaluation.top_k, 2);
        assert_eq!(
            config.evaluation.metrics,
            vec![MetricKind::TokenF1, MetricKind::ExactMatch]
        );
    }

    #[test]
    fn test_unknown_metric_is_parse_error() {
        let json = r#"{ "evaluation": { "metrics": ["bleu"] } }"#;
        assert!(matches!(
            parse(json),
            Err(ConfigError::ParseError { format: "JSON", .. })
        ));
    }
}
