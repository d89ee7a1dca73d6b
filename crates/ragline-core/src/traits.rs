//! Seams to the external models. Backends implement these; the pipeline only
//! ever sees trait objects, so tests swap in fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Text-to-vector model.
///
/// Implementations return raw model output; normalization and dimension
/// checks happen in the embedding provider that wraps them.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Decoding parameters sent with every generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
    /// Always 0.0: decoding is greedy
    pub temperature: f32,
    /// Backend-specific pass-through parameters
    pub options: BTreeMap<String, Value>,
}

impl GenerationRequest {
    pub fn greedy(prompt: impl Into<String>, max_new_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens,
            temperature: 0.0,
            options: BTreeMap::new(),
        }
    }
}

/// Text-to-text model. Returns the raw decoded output, which may echo the prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
