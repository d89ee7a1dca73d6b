//! Error taxonomy shared by every pipeline stage.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Debug, Error)]
pub enum RagError {
    /// Caller supplied an unusable value (k = 0, empty corpus record, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedding backend failed or returned unusable vectors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The similarity index could not be built or queried
    #[error("Index error: {0}")]
    Index(String),

    /// The generation backend failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Index rows and chunk store disagree. Always a defect.
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// A backend call ran past its deadline and was dropped
    #[error("{operation} cancelled after {timeout_secs}s")]
    Cancelled {
        operation: &'static str,
        timeout_secs: u64,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RagError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InternalInvariantViolation(msg.into())
    }

    /// Short stable label, used in logs and evaluation skip records
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Embedding(_) => "embedding",
            Self::Index(_) => "index",
            Self::Generation(_) => "generation",
            Self::InternalInvariantViolation(_) => "internal_invariant_violation",
            Self::Cancelled { .. } => "cancelled",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_kind() {
        let err = RagError::index("no vectors to index");
        assert_eq!(err.to_string(), "Index error: no vectors to index");
        assert_eq!(err.kind(), "index");

        let err = RagError::Cancelled {
            operation: "generation",
            timeout_secs: 30,
        };
        assert_eq!(err.to_string(), "generation cancelled after 30s");
        assert_eq!(err.kind(), "cancelled");
    }
}
