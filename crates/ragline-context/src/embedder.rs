use crate::deadline::bounded;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use ragline_config::{EmbeddingBackend, EmbeddingConfig};
use ragline_core::traits::Embedder;
use ragline_core::vector::normalize;
use ragline_core::{RagError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Wraps an [`Embedder`] backend and guarantees that everything it hands out
/// is unit-length and of one fixed width.
///
/// The width is learned from the first successful call and enforced for the
/// lifetime of the provider, so corpus vectors (batch-encoded) and query
/// vectors (encoded one at a time) are always comparable.
pub struct EmbeddingProvider {
    backend: Arc<dyn Embedder>,
    batch_size: usize,
    timeout_secs: u64,
    dimension: OnceLock<usize>,
}

impl EmbeddingProvider {
    pub fn new(backend: Arc<dyn Embedder>, config: &EmbeddingConfig) -> Self {
        Self {
            backend,
            batch_size: config.batch_size.max(1),
            timeout_secs: config.timeout_secs,
            dimension: OnceLock::new(),
        }
    }

    /// Width of the vectors produced so far, if any call has succeeded
    pub fn dimension(&self) -> Option<usize> {
        self.dimension.get().copied()
    }

    /// Encode corpus texts in order, `batch_size` texts per backend request.
    pub async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for (batch_no, batch) in texts.chunks(self.batch_size).enumerate() {
            let raw = bounded("embedding", self.timeout_secs, self.backend.embed_batch(batch))
                .await?
                .map_err(|e| RagError::embedding(format!("batch {}: {:#}", batch_no, e)))?;

            if raw.len() != batch.len() {
                return Err(RagError::embedding(format!(
                    "batch {}: got {} vectors for {} texts",
                    batch_no,
                    raw.len(),
                    batch.len()
                )));
            }
            for vector in raw {
                vectors.push(self.finish(vector)?);
            }
            debug!(batch = batch_no, encoded = vectors.len(), "encoded batch");
        }
        Ok(vectors)
    }

    /// Encode a single query text into the same normalized space.
    pub async fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        let raw = bounded("embedding", self.timeout_secs, self.backend.embed(text))
            .await?
            .map_err(|e| RagError::embedding(format!("{:#}", e)))?;
        self.finish(raw)
    }

    /// Normalize before pinning the width, so an empty first vector never fixes it at 0.
    fn finish(&self, vector: Vec<f32>) -> Result<Vec<f32>> {
        let vector = normalize(vector)
            .ok_or_else(|| RagError::embedding("backend returned a zero or non-finite vector"))?;
        let width = vector.len();
        let expected = *self.dimension.get_or_init(|| width);
        if width != expected {
            return Err(RagError::embedding(format!(
                "backend returned a {}-dimensional vector, expected {}",
                width, expected
            )));
        }
        Ok(vector)
    }
}

/// Build the embedding backend named by `config`.
///
/// OpenAI needs `OPENAI_API_KEY`; Ollama honours `OLLAMA_BASE_URL` when no
/// `api_base` is configured.
pub fn select_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::OpenAi => {
            let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
                RagError::embedding("embedding.backend is 'openai' but OPENAI_API_KEY is not set")
            })?;
            let base_url = config
                .api_base
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
            info!(model = %config.model_name, %base_url, "using OpenAI embeddings");
            Ok(Arc::new(OpenAiEmbedder {
                model: config.model_name.clone(),
                api_key,
                base_url,
                client: Client::new(),
            }))
        }
        EmbeddingBackend::Ollama => {
            let base_url = config
                .api_base
                .clone()
                .or_else(|| env::var("OLLAMA_BASE_URL").ok())
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            info!(model = %config.model_name, %base_url, "using Ollama embeddings");
            Ok(Arc::new(OllamaEmbedder {
                model: config.model_name.clone(),
                base_url,
                client: Client::new(),
            }))
        }
    }
}

struct OpenAiEmbedder {
    model: String,
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop().ok_or_else(|| anyhow!("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let resp = self
            .client
            .post(format!("{}/embeddings", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await
            .context("OpenAI embeddings request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI embeddings failed ({}): {}", status, body));
        }

        let mut parsed: OpenAiEmbeddingResponse = resp.json().await?;
        parsed.data.sort_by_key(|item| item.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

struct OllamaEmbedder {
    model: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop().ok_or_else(|| anyhow!("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let resp = self
            .client
            .post(format!("{}/api/embed", self.base_url.trim_end_matches('/')))
            .json(&serde_json::json!({
                "model": self.model,
                "input": texts,
            }))
            .send()
            .await
            .context("Ollama embeddings request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama embeddings failed ({}): {}", status, body));
        }

        let parsed: OllamaEmbedResponse = resp.json().await?;
        Ok(parsed.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragline_core::vector::l2_norm;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Maps a text to `[len, vowels, 1]`; counts backend round-trips.
    #[derive(Default)]
    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    fn features(text: &str) -> Vec<f32> {
        let vowels = text.chars().filter(|c| "aeiou".contains(*c)).count();
        vec![text.len() as f32, vowels as f32, 1.0]
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(features(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| features(t)).collect())
        }
    }

    struct ShortBatchEmbedder;

    #[async_trait]
    impl Embedder for ShortBatchEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0]; texts.len().saturating_sub(1)])
        }
    }

    struct WidthChangingEmbedder;

    #[async_trait]
    impl Embedder for WidthChangingEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0]; texts.len()])
        }
    }

    /// Returns an empty vector on its first call, then `[1, 0]`.
    #[derive(Default)]
    struct EmptyFirstEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for EmptyFirstEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Vec::new())
            } else {
                Ok(vec![1.0, 0.0])
            }
        }

        async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0, 0.0]; texts.len()])
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Err(anyhow!("backend unavailable"))
        }

        async fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Err(anyhow!("backend unavailable"))
        }
    }

    struct SlowEmbedder;

    #[async_trait]
    impl Embedder for SlowEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![vec![1.0]; texts.len()])
        }
    }

    fn provider(backend: Arc<dyn Embedder>, batch_size: usize) -> EmbeddingProvider {
        let config = EmbeddingConfig {
            batch_size,
            ..Default::default()
        };
        EmbeddingProvider::new(backend, &config)
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_batch_and_single_share_space() {
        let provider = provider(Arc::new(CountingEmbedder::default()), 2);
        let corpus = provider
            .encode_batch(&texts(&["alpha", "beta", "gamma"]))
            .await
            .unwrap();
        let query = provider.encode_one("beta").await.unwrap();

        assert_eq!(corpus.len(), 3);
        for v in corpus.iter().chain(std::iter::once(&query)) {
            assert!((l2_norm(v) - 1.0).abs() < 1e-5);
        }
        assert_eq!(corpus[1], query);
        assert_eq!(provider.dimension(), Some(3));
    }

    #[tokio::test]
    async fn test_batches_split_by_size() {
        let backend = Arc::new(CountingEmbedder::default());
        let provider = provider(backend.clone(), 2);
        provider
            .encode_batch(&texts(&["a", "b", "c", "d", "e"]))
            .await
            .unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_backend() {
        let backend = Arc::new(CountingEmbedder::default());
        let provider = provider(backend.clone(), 8);
        assert!(provider.encode_batch(&[]).await.unwrap().is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_embedding_error() {
        let provider = provider(Arc::new(ShortBatchEmbedder), 8);
        let err = provider.encode_batch(&texts(&["a", "b"])).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_width_change_is_embedding_error() {
        let provider = provider(Arc::new(WidthChangingEmbedder), 8);
        provider.encode_batch(&texts(&["a"])).await.unwrap();
        let err = provider.encode_one("q").await.unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[tokio::test]
    async fn test_empty_vector_does_not_pin_dimension() {
        let provider = provider(Arc::new(EmptyFirstEmbedder::default()), 8);
        let err = provider.encode_one("q").await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
        assert_eq!(provider.dimension(), None);

        assert_eq!(provider.encode_one("q").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(provider.dimension(), Some(2));
    }

    #[tokio::test]
    async fn test_backend_failure_is_embedding_error() {
        let provider = provider(Arc::new(FailingEmbedder), 8);
        let err = provider.encode_one("q").await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(ref m) if m.contains("backend unavailable")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cancels() {
        let config = EmbeddingConfig {
            timeout_secs: 5,
            ..Default::default()
        };
        let provider = EmbeddingProvider::new(Arc::new(SlowEmbedder), &config);
        let err = provider.encode_one("q").await.unwrap_err();
        assert!(matches!(
            err,
            RagError::Cancelled {
                operation: "embedding",
                timeout_secs: 5
            }
        ));
    }
}
