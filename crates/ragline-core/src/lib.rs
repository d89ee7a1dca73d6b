//! Shared building blocks for the ragline retrieval-augmented generation
//! pipeline: the chunk model, the error taxonomy, provider traits and the
//! vector helpers every stage agrees on.

pub mod corpus;
pub mod error;
pub mod models;
pub mod traits;
pub mod vector;

pub use error::{RagError, Result};
pub use models::{Chunk, ChunkStore, Metadata};
pub use traits::{Embedder, GenerationRequest, TextGenerator};
