use ragline_core::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// One question/reference pair.
///
/// Both fields are optional so a malformed item is skipped during the batch
/// rather than failing the whole load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalItem {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub reference_answer: Option<String>,
}

impl EvalItem {
    pub fn new(question: impl Into<String>, reference_answer: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            reference_answer: Some(reference_answer.into()),
        }
    }
}

/// Read a JSON array of `{question, reference_answer}` objects.
pub fn load_eval_set(path: &Path) -> Result<Vec<EvalItem>> {
    let raw = fs::read_to_string(path).map_err(|source| RagError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items: Vec<EvalItem> =
        serde_json::from_str(&raw).map_err(|source| RagError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
    info!(items = items.len(), path = %path.display(), "loaded evaluation set");
    Ok(items)
}
