use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Citation metadata attached to a chunk (`title`, `link`, `source`, ...).
pub type Metadata = BTreeMap<String, String>;

/// A unit of corpus text plus its citation metadata.
///
/// Chunks have no identifier of their own: identity is the position in the
/// [`ChunkStore`] that owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.meta("title")
    }

    /// `link`, falling back to `source`
    pub fn link(&self) -> Option<&str> {
        self.meta("link").or_else(|| self.meta("source"))
    }

    /// Metadata value, treating blank strings as absent
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// The ordered, immutable corpus.
///
/// Row `i` here is row `i` of the similarity index built from it; the order
/// is fixed at construction and there is no mutation API. Cloning shares the
/// underlying slice.
#[derive(Debug, Clone, Default)]
pub struct ChunkStore {
    chunks: Arc<[Chunk]>,
}

impl ChunkStore {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Chunk> {
        self.chunks.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn as_slice(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Chunk texts in row order, as submitted to the embedding backend
    pub fn contents(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.content.clone()).collect()
    }
}

impl From<Vec<Chunk>> for ChunkStore {
    fn from(chunks: Vec<Chunk>) -> Self {
        Self::new(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_falls_back_to_source() {
        let chunk = Chunk::new("text").with_meta("source", "handbook.pdf");
        assert_eq!(chunk.link(), Some("handbook.pdf"));

        let chunk = chunk.with_meta("link", "https://example.org/h");
        assert_eq!(chunk.link(), Some("https://example.org/h"));
    }

    #[test]
    fn test_blank_metadata_is_absent() {
        let chunk = Chunk::new("text").with_meta("title", "  ");
        assert_eq!(chunk.title(), None);
    }

    #[test]
    fn test_store_preserves_order() {
        let store = ChunkStore::new(vec![Chunk::new("a"), Chunk::new("b"), Chunk::new("c")]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.contents(), vec!["a", "b", "c"]);
        assert_eq!(store.get(1).map(|c| c.content.as_str()), Some("b"));
        assert!(store.get(3).is_none());
    }

    #[test]
    fn test_deserialize_without_metadata() {
        let chunk: Chunk = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert!(chunk.metadata.is_empty());
    }
}
