//! Loading pre-chunked corpora from JSON.

use crate::error::{RagError, Result};
use crate::models::{Chunk, ChunkStore};
use std::fs;
use std::path::Path;
use tracing::info;

/// Read a JSON array of `{content, metadata}` records into a [`ChunkStore`],
/// keeping file order. Blank `content` is rejected.
pub fn load_corpus(path: &Path) -> Result<ChunkStore> {
    let raw = fs::read_to_string(path).map_err(|source| RagError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let chunks: Vec<Chunk> =
        serde_json::from_str(&raw).map_err(|source| RagError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(pos) = chunks.iter().position(|c| c.content.trim().is_empty()) {
        return Err(RagError::invalid_argument(format!(
            "corpus record {} in {} has empty content",
            pos,
            path.display()
        )));
    }

    info!(chunks = chunks.len(), path = %path.display(), "loaded corpus");
    Ok(ChunkStore::new(chunks))
}
