use anyhow::{anyhow, Context};
use async_trait::async_trait;
use ragline_config::{GenerationBackend, GenerationConfig};
use ragline_core::traits::{GenerationRequest, TextGenerator};
use ragline_core::{RagError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::env;
use std::sync::Arc;
use tracing::info;

/// Build the generation backend named by `config`.
pub fn select_generator(config: &GenerationConfig) -> Result<Arc<dyn TextGenerator>> {
    match config.backend {
        GenerationBackend::OpenAi => {
            let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
                RagError::generation("generation.backend is 'openai' but OPENAI_API_KEY is not set")
            })?;
            let base_url = config
                .api_base
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
            info!(model = %config.model, %base_url, "using OpenAI generation");
            Ok(Arc::new(OpenAiGenerator::new(
                config.model.clone(),
                api_key,
                base_url,
            )))
        }
        GenerationBackend::Ollama => {
            let base_url = config
                .api_base
                .clone()
                .or_else(|| env::var("OLLAMA_BASE_URL").ok());
            let generator = OllamaGenerator::new(config.model.clone(), base_url);
            info!(model = %config.model, base_url = %generator.base_url, "using Ollama generation");
            Ok(Arc::new(generator))
        }
    }
}

/// Copy pass-through options into `target` without clobbering keys we set ourselves.
fn merge_options(target: &mut Map<String, Value>, request: &GenerationRequest) {
    for (key, value) in &request.options {
        target.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl OpenAiGenerator {
    pub fn new(model: String, api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client: Client::new(),
        }
    }

    fn body(&self, request: &GenerationRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), Value::from(self.model.clone()));
        body.insert(
            "messages".into(),
            serde_json::json!([{ "role": "user", "content": request.prompt }]),
        );
        body.insert("max_tokens".into(), Value::from(request.max_new_tokens));
        body.insert("temperature".into(), Value::from(request.temperature));
        merge_options(&mut body, request);
        Value::Object(body)
    }
}

#[derive(Debug, Deserialize)]
struct ChatRespChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResp {
    choices: Vec<ChatRespChoice>,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&self.body(request))
            .send()
            .await
            .context("OpenAI request failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI error {}: {}", status, txt));
        }
        let parsed: ChatResp = resp.json().await?;
        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        Ok(content)
    }
}

pub struct OllamaGenerator {
    model: String,
    base_url: String,
    client: Client,
}

impl OllamaGenerator {
    pub fn new(model: String, base_url: Option<String>) -> Self {
        Self {
            model,
            base_url: base_url.unwrap_or_else(|| "http://localhost:11434".to_string()),
            client: Client::new(),
        }
    }

    fn body(&self, request: &GenerationRequest) -> Value {
        let mut options = Map::new();
        options.insert("temperature".into(), Value::from(request.temperature));
        options.insert("num_predict".into(), Value::from(request.max_new_tokens));
        merge_options(&mut options, request);
        serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": options,
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(url)
            .json(&self.body(request))
            .send()
            .await
            .context("Ollama request failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama error {}: {}", status, txt));
        }
        let json: Value = resp.json().await?;
        let content = json["response"].as_str().unwrap_or("").to_string();
        Ok(content)
    }
}
