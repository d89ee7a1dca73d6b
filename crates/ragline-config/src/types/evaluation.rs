//! Batch evaluation configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Automatic metrics available to the evaluator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Share of answer tokens found in the reference
    TokenPrecision,
    /// Share of reference tokens found in the answer
    TokenRecall,
    /// Harmonic mean of token precision and recall
    TokenF1,
    /// 1.0 when normalized answer equals normalized reference
    ExactMatch,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::TokenPrecision,
        MetricKind::TokenRecall,
        MetricKind::TokenF1,
        MetricKind::ExactMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::TokenPrecision => "token_precision",
            MetricKind::TokenRecall => "token_recall",
            MetricKind::TokenF1 => "token_f1",
            MetricKind::ExactMatch => "exact_match",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name.trim().to_lowercase())
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluation harness configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationConfig {
    /// Chunks retrieved per evaluation question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Metrics computed for every answered question
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricKind>,

    /// Default question set location
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Decimal places kept on per-item scores
    #[serde(default = "default_score_precision")]
    pub score_precision: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            metrics: default_metrics(),
            file: default_file(),
            score_precision: default_score_precision(),
        }
    }
}

impl crate::validation::Validate for EvaluationConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        crate::validation::validate_top_k("evaluation.top_k", self.top_k)?;

        if self.metrics.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "evaluation.metrics".to_string(),
                message: "At least one metric must be configured".to_string(),
            });
        }

        if self.score_precision > 9 {
            return Err(ConfigError::OutOfRange {
                field: "evaluation.score_precision".to_string(),
                value: self.score_precision as f32,
                min: 0.0,
                max: 9.0,
            });
        }

        Ok(())
    }
}

fn default_top_k() -> usize {
    4
}

fn default_metrics() -> Vec<MetricKind> {
    vec![
        MetricKind::TokenPrecision,
        MetricKind::TokenRecall,
        MetricKind::TokenF1,
    ]
}

fn default_file() -> PathBuf {
    PathBuf::from("eval_questions.json")
}

fn default_score_precision() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = EvaluationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 4);
        assert_eq!(config.score_precision, 3);
    }

    #[test]
    fn test_empty_metrics_invalid() {
        let config = EvaluationConfig {
            metrics: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_metric_names_roundtrip() {
        for kind in MetricKind::ALL {
            assert_eq!(MetricKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(MetricKind::from_name("bleu"), None);
    }

    #[test]
    fn test_metric_serialization() {
        assert_eq!(
            serde_json::to_string(&MetricKind::TokenF1).unwrap(),
            "\"token_f1\""
        );
    }
}
