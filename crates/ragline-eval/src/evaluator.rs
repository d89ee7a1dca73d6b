use crate::dataset::EvalItem;
use crate::metrics::{metric_for, Metric};
use ragline_config::EvaluationConfig;
use ragline_core::{RagError, Result};
use ragline_pipeline::RagPipeline;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorState {
    Idle,
    Running,
    Completed,
}

/// One successfully answered and scored question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    /// 0-based position in the input batch
    pub position: usize,
    pub question: String,
    pub reference_answer: String,
    pub model_answer: String,
    pub metric_scores: BTreeMap<String, f64>,
    pub retrieved_chunk_contents: Vec<String>,
    /// Title of each retrieved chunk, empty when the chunk has none
    pub retrieved_titles: Vec<String>,
    pub sources: Vec<String>,
}

/// An input item that produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub position: usize,
    pub reason: String,
}

/// Mean of one metric over the successful records.
///
/// `mean` is NaN when nothing succeeded; serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: String,
    pub mean: f64,
    pub count: usize,
}

impl MetricSummary {
    /// False when there were no successful records to average
    pub fn is_defined(&self) -> bool {
        !self.mean.is_nan()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub records: Vec<EvaluationRecord>,
    pub skipped: Vec<SkippedItem>,
    pub summary: Vec<MetricSummary>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Runs a question set through a pipeline once and scores every answer.
///
/// `Idle -> Running -> Completed`; an evaluator is single-use.
pub struct Evaluator {
    pipeline: Arc<RagPipeline>,
    metrics: Vec<Box<dyn Metric>>,
    top_k: usize,
    precision: u32,
    state: EvaluatorState,
}

impl Evaluator {
    pub fn new(pipeline: Arc<RagPipeline>, config: &EvaluationConfig) -> Self {
        let metrics = config.metrics.iter().copied().map(metric_for).collect();
        Self::with_metrics(pipeline, metrics, config)
    }

    /// Use custom scorers instead of the configured ones.
    pub fn with_metrics(
        pipeline: Arc<RagPipeline>,
        metrics: Vec<Box<dyn Metric>>,
        config: &EvaluationConfig,
    ) -> Self {
        Self {
            pipeline,
            metrics,
            top_k: config.top_k,
            precision: config.score_precision,
            state: EvaluatorState::Idle,
        }
    }

    pub fn state(&self) -> EvaluatorState {
        self.state
    }

    /// Evaluate `items` in order. Failing items are skipped and reported; the
    /// batch itself only fails when the evaluator has already run.
    pub async fn evaluate_batch(&mut self, items: &[EvalItem]) -> Result<BatchReport> {
        if self.state != EvaluatorState::Idle {
            return Err(RagError::invalid_argument(
                "evaluator has already run; create a new one for another batch",
            ));
        }
        self.state = EvaluatorState::Running;
        info!(items = items.len(), top_k = self.top_k, "evaluation started");

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for (position, item) in items.iter().enumerate() {
            match self.evaluate_item(position, item).await {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(position, %reason, "skipping evaluation item");
                    skipped.push(SkippedItem { position, reason });
                }
            }
        }

        let summary = self.summarize(&records);
        for s in &summary {
            info!(metric = %s.metric, mean = s.mean, count = s.count, "metric summary");
        }
        info!(
            succeeded = records.len(),
            skipped = skipped.len(),
            "evaluation completed"
        );

        self.state = EvaluatorState::Completed;
        Ok(BatchReport {
            records,
            skipped,
            summary,
        })
    }

    async fn evaluate_item(
        &self,
        position: usize,
        item: &EvalItem,
    ) -> std::result::Result<EvaluationRecord, String> {
        let question = present(&item.question).ok_or("missing question")?;
        let reference = present(&item.reference_answer).ok_or("missing reference_answer")?;

        let response = self
            .pipeline
            .run(question, self.top_k)
            .await
            .map_err(|e| format!("{} failed: {}", e.kind(), e))?;

        let metric_scores = self
            .metrics
            .iter()
            .map(|m| {
                let score = m.score(&response.answer, reference);
                (m.name().to_string(), round_to(score, self.precision))
            })
            .collect();

        Ok(EvaluationRecord {
            position,
            question: question.to_string(),
            reference_answer: reference.to_string(),
            model_answer: response.answer,
            metric_scores,
            retrieved_titles: response
                .chunks
                .iter()
                .map(|c| c.title().unwrap_or_default().to_string())
                .collect(),
            retrieved_chunk_contents: response.chunks.into_iter().map(|c| c.content).collect(),
            sources: response.sources,
        })
    }

    fn summarize(&self, records: &[EvaluationRecord]) -> Vec<MetricSummary> {
        self.metrics
            .iter()
            .map(|m| {
                let scores: Vec<f64> = records
                    .iter()
                    .filter_map(|r| r.metric_scores.get(m.name()).copied())
                    .collect();
                let mean = if scores.is_empty() {
                    f64::NAN
                } else {
                    round_to(scores.iter().sum::<f64>() / scores.len() as f64, self.precision)
                };
                MetricSummary {
                    metric: m.name().to_string(),
                    mean,
                    count: scores.len(),
                }
            })
            .collect()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
        assert_eq!(round_to(0.5, 0), 1.0);
    }

    #[test]
    fn test_undefined_summary() {
        let s = MetricSummary {
            metric: "token_f1".into(),
            mean: f64::NAN,
            count: 0,
        };
        assert!(!s.is_defined());
        let zero = MetricSummary { mean: 0.0, ..s };
        assert!(zero.is_defined());
    }

    #[test]
    fn test_blank_fields_are_missing() {
        assert_eq!(present(&Some("  ".into())), None);
        assert_eq!(present(&None), None);
        assert_eq!(present(&Some("q".into())), Some("q"));
    }
}
