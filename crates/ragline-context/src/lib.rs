//! Model-facing adapters: the embedding provider and generator adapter that
//! wrap the [`ragline_core::Embedder`] / [`ragline_core::TextGenerator`]
//! seams, plus HTTP backends for OpenAI-compatible APIs and Ollama.

mod deadline;
pub mod embedder;
pub mod generator;
pub mod llm;

pub use embedder::{select_embedder, EmbeddingProvider};
pub use generator::{extract_answer, truncate_prompt, GeneratorAdapter};
pub use llm::select_generator;
