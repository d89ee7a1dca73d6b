//! Retrieval, prompt assembly and the end-to-end question answering pipeline.

pub mod pipeline;
pub mod prompt;
pub mod retriever;

pub use pipeline::{RagPipeline, RagResponse};
pub use prompt::{compose_prompt, extract_sources};
pub use retriever::{Retriever, ScoredChunk};
