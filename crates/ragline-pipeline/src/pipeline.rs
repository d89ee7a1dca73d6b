use crate::prompt::{compose_prompt, extract_sources};
use crate::retriever::{Retriever, ScoredChunk};
use ragline_config::Config;
use ragline_context::{truncate_prompt, EmbeddingProvider, GeneratorAdapter};
use ragline_core::traits::{Embedder, TextGenerator};
use ragline_core::{Chunk, ChunkStore, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Everything produced while answering one query.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub answer: String,
    pub chunks: Vec<Chunk>,
    /// Distance of each entry in `chunks` to the query
    pub distances: Vec<f32>,
    /// Prompt as sent to the backend, after `generation.max_prompt_chars`
    pub prompt: String,
    pub sources: Vec<String>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Retrieve, augment, generate.
///
/// Built once over a fixed corpus; afterwards read-only, so one pipeline can
/// serve concurrent queries.
pub struct RagPipeline {
    retriever: Retriever,
    generator: GeneratorAdapter,
    config: Config,
}

impl RagPipeline {
    /// Encode `chunks`, build the index and wire up the generator.
    pub async fn open(
        chunks: ChunkStore,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
        config: Config,
    ) -> Result<Self> {
        let provider = Arc::new(EmbeddingProvider::new(embedder, &config.embedding));
        let retriever = Retriever::build(chunks, provider).await?;
        let generator = GeneratorAdapter::new(generator, config.generation.clone());
        info!(chunks = retriever.chunks().len(), "pipeline ready");
        Ok(Self {
            retriever,
            generator,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Answer `query` from the `retrieval.top_k` nearest chunks.
    pub async fn ask(&self, query: &str) -> Result<RagResponse> {
        self.run(query, self.config.retrieval.top_k).await
    }

    /// Answer `query` from the `k` nearest chunks. Stops at the first failing stage.
    pub async fn run(&self, query: &str, k: usize) -> Result<RagResponse> {
        let started = Instant::now();

        let hits = self.retriever.retrieve_scored(query, k).await?;
        let (chunks, distances): (Vec<Chunk>, Vec<f32>) = hits
            .into_iter()
            .map(|ScoredChunk { chunk, distance, .. }| (chunk, distance))
            .unzip();

        let composed = compose_prompt(query, &chunks);
        let prompt =
            truncate_prompt(&composed, self.generator.config().max_prompt_chars).into_owned();
        debug!(
            composed_chars = composed.len(),
            prompt_chars = prompt.len(),
            "prompt composed"
        );

        let answer = self.generator.generate(&prompt).await?;
        let sources = extract_sources(&chunks, &self.config.citation);

        let elapsed = started.elapsed();
        debug!(
            answer_chars = answer.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "query answered"
        );
        Ok(RagResponse {
            answer,
            chunks,
            distances,
            prompt,
            sources,
            elapsed,
        })
    }
}
