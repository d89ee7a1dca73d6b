//! Configuration type definitions
//!
//! This module contains all configuration structures organized by concern.
//! Each type is self-contained with validation and sensible defaults.

pub mod citation;
pub mod embedding;
pub mod evaluation;
pub mod generation;
pub mod retrieval;

// Re-export all types for convenience
pub use citation::CitationConfig;
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use evaluation::{EvaluationConfig, MetricKind};
pub use generation::{GenerationBackend, GenerationConfig};
pub use retrieval::RetrievalConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
///
/// This is the top-level configuration that users interact with.
/// It's organized by pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval behavior
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Text generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Citation fallbacks for missing metadata
    #[serde(default)]
    pub citation: CitationConfig,

    /// Batch evaluation settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.embedding.validate()?;
        self.retrieval.validate()?;
        self.generation.validate()?;
        self.citation.validate()?;
        self.evaluation.validate()?;

        Ok(())
    }
}
