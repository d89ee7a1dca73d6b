use ragline_context::EmbeddingProvider;
use ragline_core::{Chunk, ChunkStore, RagError, Result};
use ragline_index::flat::FlatIndex;
use ragline_index::SimilarityIndex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A retrieved chunk with its squared L2 distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub row: usize,
    pub distance: f32,
    pub chunk: Chunk,
}

/// Query-time lookup over an immutable corpus.
///
/// Index row `i` is chunk `i` of the store for the retriever's lifetime.
pub struct Retriever {
    chunks: ChunkStore,
    index: Arc<dyn SimilarityIndex>,
    embedder: Arc<EmbeddingProvider>,
}

impl Retriever {
    /// Encode every chunk and build the flat index over them.
    pub async fn build(chunks: ChunkStore, embedder: Arc<EmbeddingProvider>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(RagError::index("corpus is empty; nothing to index"));
        }
        let vectors = embedder.encode_batch(&chunks.contents()).await?;
        let index = FlatIndex::build(vectors)?;
        info!(
            chunks = chunks.len(),
            dimension = index.dimension(),
            "corpus indexed"
        );
        Self::with_index(chunks, Arc::new(index), embedder)
    }

    /// Pair a store with an already built index. Row counts must agree.
    pub fn with_index(
        chunks: ChunkStore,
        index: Arc<dyn SimilarityIndex>,
        embedder: Arc<EmbeddingProvider>,
    ) -> Result<Self> {
        if index.len() != chunks.len() {
            return Err(RagError::invariant(format!(
                "index has {} rows but the chunk store holds {} chunks",
                index.len(),
                chunks.len()
            )));
        }
        Ok(Self {
            chunks,
            index,
            embedder,
        })
    }

    pub fn chunks(&self) -> &ChunkStore {
        &self.chunks
    }

    /// The `min(k, N)` chunks nearest to `query`, nearest first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        Ok(self
            .retrieve_scored(query, k)
            .await?
            .into_iter()
            .map(|hit| hit.chunk)
            .collect())
    }

    pub async fn retrieve_scored(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(RagError::invalid_argument("k must be at least 1"));
        }
        let vector = self.embedder.encode_one(query).await?;
        let neighbors = self.index.search(&vector, k)?;

        let hits = neighbors
            .into_iter()
            .map(|n| {
                let chunk = self.chunks.get(n.row).ok_or_else(|| {
                    RagError::invariant(format!(
                        "index returned row {} but the chunk store holds {} chunks",
                        n.row,
                        self.chunks.len()
                    ))
                })?;
                Ok(ScoredChunk {
                    row: n.row,
                    distance: n.distance,
                    chunk: chunk.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            k,
            hits = hits.len(),
            best = hits.first().map(|h| h.distance),
            "retrieved"
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragline_config::EmbeddingConfig;
    use ragline_core::traits::Embedder;
    use ragline_index::Neighbor;

    /// Axis-aligned embedding keyed on a leading keyword.
    struct KeywordEmbedder;

    fn axis(text: &str) -> Vec<f32> {
        if text.contains("france") {
            vec![1.0, 0.0, 0.0]
        } else if text.contains("water") {
            vec![0.0, 1.0, 0.0]
        } else {
            vec![0.0, 0.0, 1.0]
        }
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(axis(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| axis(t)).collect())
        }
    }

    /// Claims one row and returns a row past the end of any store.
    struct RogueIndex;

    impl SimilarityIndex for RogueIndex {
        fn dimension(&self) -> usize {
            3
        }

        fn len(&self) -> usize {
            1
        }

        fn search(&self, _query: &[f32], _k: usize) -> Result<Vec<Neighbor>> {
            Ok(vec![Neighbor {
                row: 7,
                distance: 0.0,
            }])
        }
    }

    fn provider() -> Arc<EmbeddingProvider> {
        Arc::new(EmbeddingProvider::new(
            Arc::new(KeywordEmbedder),
            &EmbeddingConfig::default(),
        ))
    }

    fn store() -> ChunkStore {
        ChunkStore::new(vec![
            Chunk::new("france: Paris is the capital").with_meta("title", "Geo"),
            Chunk::new("water boils at 100 C").with_meta("title", "Physics"),
            Chunk::new("misc trivia"),
        ])
    }

    #[tokio::test]
    async fn test_retrieve_nearest_first() {
        let retriever = Retriever::build(store(), provider()).await.unwrap();
        let hits = retriever.retrieve_scored("water?", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].row, 1);
        assert_eq!(hits[0].chunk.title(), Some("Physics"));
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[tokio::test]
    async fn test_k_beyond_corpus_returns_all() {
        let retriever = Retriever::build(store(), provider()).await.unwrap();
        let chunks = retriever.retrieve("france", 10).await.unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "france: Paris is the capital");
    }

    #[tokio::test]
    async fn test_zero_k_rejected() {
        let retriever = Retriever::build(store(), provider()).await.unwrap();
        let err = retriever.retrieve("france", 0).await.unwrap_err();
        assert!(matches!(err, RagError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_empty_corpus_is_index_error() {
        let err = Retriever::build(ChunkStore::default(), provider())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RagError::Index(_)));
    }

    #[tokio::test]
    async fn test_row_out_of_bounds_is_invariant_violation() {
        let chunks = ChunkStore::new(vec![Chunk::new("only")]);
        let retriever = Retriever::with_index(chunks, Arc::new(RogueIndex), provider()).unwrap();
        let err = retriever.retrieve("q", 1).await.unwrap_err();
        assert!(matches!(err, RagError::InternalInvariantViolation(_)));
    }

    #[test]
    fn test_row_count_mismatch_rejected() {
        let result = Retriever::with_index(store(), Arc::new(RogueIndex), provider());
        assert!(matches!(result, Err(RagError::InternalInvariantViolation(_))));
    }
}
