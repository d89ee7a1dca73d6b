//! Environment variable configuration overlay
//!
//! Variables have the form `RAGLINE_<SECTION>_<FIELD>=value`, e.g.
//! - `RAGLINE_RETRIEVAL_TOP_K=5`
//! - `RAGLINE_GENERATION_MODEL=llama3`
//! - `RAGLINE_EMBEDDING_BACKEND=openai`
//! - `RAGLINE_EVALUATION_METRICS=token_f1,exact_match`

use crate::{error::ConfigError, types::MetricKind, Result};
use serde_json::{Map, Value};
use std::env;
use std::str::FromStr;

pub const ENV_PREFIX: &str = "RAGLINE_";

/// Build a sparse layer from `RAGLINE_*` variables; `None` when none are set.
///
/// Malformed variables are reported as errors rather than skipped.
pub fn from_env() -> Result<Option<Value>> {
    let vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect();
    from_vars(vars)
}

pub fn from_vars<I>(vars: I) -> Result<Option<Value>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut layer = Map::new();
    let mut found_any = false;

    for (key, value) in vars {
        found_any = true;
        let (section, field, parsed) = parse_env_var(&key, &value)?;
        if let Value::Object(fields) = layer
            .entry(section)
            .or_insert_with(|| Value::Object(Map::new()))
        {
            fields.insert(field, parsed);
        }
    }

    Ok(found_any.then_some(Value::Object(layer)))
}

fn parse_env_var(key: &str, value: &str) -> Result<(String, String, Value)> {
    let stripped = key.strip_prefix(ENV_PREFIX).unwrap_or(key);

    let Some((section, field)) = stripped.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: RAGLINE_<SECTION>_<FIELD>".to_string(),
        });
    };
    let section = section.to_lowercase();
    let field = field.to_lowercase();

    let parsed = match section.as_str() {
        "embedding" => embedding_var(key, &field, value)?,
        "retrieval" => retrieval_var(key, &field, value)?,
        "generation" => generation_var(key, &field, value)?,
        "citation" => citation_var(key, &field, value)?,
        "evaluation" => evaluation_var(key, &field, value)?,
        _ => {
            return Err(ConfigError::EnvVarError {
                var: key.to_string(),
                message: format!("Unknown section: {}", section),
            })
        }
    };
    Ok((section, field, parsed))
}

fn parse_value<T: FromStr>(var: &str, value: &str, kind: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Invalid {}: {}", kind, value),
    })
}

fn integer(var: &str, value: &str) -> Result<Value> {
    parse_value::<u64>(var, value, "integer").map(Value::from)
}

fn backend(field: &str, value: &str) -> Result<Value> {
    match value.trim().to_lowercase().as_str() {
        name @ ("openai" | "ollama") => Ok(Value::from(name)),
        _ => Err(ConfigError::invalid_enum(field, value, &["openai", "ollama"])),
    }
}

fn unknown_field(var: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Unknown field: {}", field),
    }
}

fn embedding_var(var: &str, field: &str, value: &str) -> Result<Value> {
    match field {
        "backend" => backend("embedding.backend", value),
        "model_name" | "api_base" => Ok(Value::from(value)),
        "batch_size" | "timeout_secs" => integer(var, value),
        _ => Err(unknown_field(var, field)),
    }
}

fn retrieval_var(var: &str, field: &str, value: &str) -> Result<Value> {
    match field {
        "top_k" => integer(var, value),
        _ => Err(unknown_field(var, field)),
    }
}

fn generation_var(var: &str, field: &str, value: &str) -> Result<Value> {
    match field {
        "backend" => backend("generation.backend", value),
        "model" | "api_base" | "answer_marker" => Ok(Value::from(value)),
        "max_new_tokens" | "max_prompt_chars" | "timeout_secs" => integer(var, value),
        "temperature" => parse_value::<f32>(var, value, "float").map(Value::from),
        _ => Err(unknown_field(var, field)),
    }
}

fn citation_var(var: &str, field: &str, value: &str) -> Result<Value> {
    match field {
        "default_title" | "default_link" => Ok(Value::from(value)),
        _ => Err(unknown_field(var, field)),
    }
}

fn evaluation_var(var: &str, field: &str, value: &str) -> Result<Value> {
    match field {
        "top_k" | "score_precision" => integer(var, value),
        "file" => Ok(Value::from(value)),
        "metrics" => {
            let names: Vec<&str> = MetricKind::ALL.iter().map(|k| k.as_str()).collect();
            value
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(|name| {
                    MetricKind::from_name(name)
                        .map(|kind| Value::from(kind.as_str()))
                        .ok_or_else(|| ConfigError::invalid_enum("evaluation.metrics", name, &names))
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
        _ => Err(unknown_field(var, field)),
    }
}
