use crate::deadline::bounded;
use ragline_config::GenerationConfig;
use ragline_core::traits::{GenerationRequest, TextGenerator};
use ragline_core::{RagError, Result};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// Greedy, bounded-length generation over any [`TextGenerator`] backend.
///
/// Every call sends the same decoding parameters, so identical prompts
/// against a deterministic backend produce identical answers.
pub struct GeneratorAdapter {
    backend: Arc<dyn TextGenerator>,
    config: GenerationConfig,
}

impl GeneratorAdapter {
    pub fn new(backend: Arc<dyn TextGenerator>, config: GenerationConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate an answer for `prompt` and return only the answer text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let prompt = truncate_prompt(prompt, self.config.max_prompt_chars);
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            max_new_tokens: self.config.max_new_tokens,
            temperature: 0.0,
            options: self.config.options.clone(),
        };

        let raw = bounded(
            "generation",
            self.config.timeout_secs,
            self.backend.generate(&request),
        )
        .await?
        .map_err(|e| RagError::generation(format!("{:#}", e)))?;

        debug!(raw_chars = raw.len(), "generation finished");
        Ok(extract_answer(&raw, &request.prompt, &self.config.answer_marker).to_string())
    }
}

/// Pull the answer out of raw model output.
///
/// Models that echo their input have the prompt stripped; otherwise the text
/// after the first `marker` is taken. Output with neither is returned as is.
pub fn extract_answer<'a>(raw: &'a str, prompt: &str, marker: &str) -> &'a str {
    if !prompt.is_empty() {
        if let Some(rest) = raw.strip_prefix(prompt) {
            return rest.trim();
        }
    }
    if !marker.is_empty() {
        if let Some(idx) = raw.find(marker) {
            return raw[idx + marker.len()..].trim();
        }
    }
    raw
}

/// Keep at most `max_chars` characters of `prompt`, dropping from the front.
///
/// The question and answer marker sit at the end of the prompt, so the tail is
/// what must survive. `0` disables truncation.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 {
        return Cow::Borrowed(prompt);
    }
    let total = prompt.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(prompt);
    }
    let skip = total - max_chars;
    let start = prompt
        .char_indices()
        .nth(skip)
        .map(|(idx, _)| idx)
        .unwrap_or(prompt.len());
    warn!(
        chars = total,
        kept = max_chars,
        "prompt exceeds generation limit; dropping leading context"
    );
    Cow::Owned(prompt[start..].to_string())
}
