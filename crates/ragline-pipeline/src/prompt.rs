use ragline_config::CitationConfig;
use ragline_core::Chunk;
use std::fmt::Write;

/// Build the augmented prompt: numbered context chunks, then the question.
///
/// Chunks are labelled `Chunk 1`, `Chunk 2`, ... in retrieval order.
pub fn compose_prompt(query: &str, chunks: &[Chunk]) -> String {
    let body: usize = chunks.iter().map(|c| c.content.len() + 16).sum();
    let mut prompt = String::with_capacity(body + query.len() + 32);
    prompt.push_str("Context:\n");
    for (i, chunk) in chunks.iter().enumerate() {
        let _ = writeln!(prompt, "Chunk {}: {}", i + 1, chunk.content);
    }
    let _ = write!(prompt, "Question: {}\nAnswer:", query);
    prompt
}

/// One `[i] title - link` citation per chunk, in order.
pub fn extract_sources(chunks: &[Chunk], citation: &CitationConfig) -> Vec<String> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[{}] {} - {}",
                i + 1,
                chunk.title().unwrap_or(&citation.default_title),
                chunk.link().unwrap_or(&citation.default_link)
            )
        })
        .collect()
}
