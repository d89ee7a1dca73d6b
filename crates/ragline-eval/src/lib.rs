//! Batch evaluation: run the pipeline over question/reference pairs and
//! score the answers.

pub mod dataset;
pub mod evaluator;
pub mod metrics;

pub use dataset::{load_eval_set, EvalItem};
pub use evaluator::{
    BatchReport, EvaluationRecord, Evaluator, EvaluatorState, MetricSummary, SkippedItem,
};
pub use metrics::{metric_for, Metric};
