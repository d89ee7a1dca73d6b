//! Error types for configuration loading and validation

pub mod format;

use std::path::PathBuf;
use thiserror::Error;

pub use format::ErrorFormatter;

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and validation
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unknown configuration format
    #[error("Unknown configuration format for file: {path}\nSupported formats: .yml, .yaml, .toml, .json")]
    UnknownFormat { path: PathBuf },

    /// File contents could not be parsed in the detected format
    #[error("Failed to parse {format} configuration{location}:\n{message}\n{context}")]
    ParseError {
        format: &'static str,
        location: String,
        message: String,
        context: String,
    },

    /// IO error
    #[error("Failed to read configuration file: {path}\n{source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid enum value
    #[error("Invalid value '{value}' for {field}\n  Valid options: {options}\n  Hint: {hint}")]
    InvalidEnum {
        field: String,
        value: String,
        options: String,
        hint: String,
    },

    /// Value out of valid range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: f32,
        min: f32,
        max: f32,
    },

    /// Invalid integer value
    #[error("{field} must be > {min}, got {value}")]
    InvalidInteger {
        field: String,
        value: usize,
        min: usize,
    },

    /// Environment variable parsing error
    #[error("Failed to parse environment variable {var}: {message}")]
    EnvVarError { var: String, message: String },

    /// Generic validation error
    #[error("Validation error: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    /// Create an invalid enum error with a "did you mean" hint
    pub fn invalid_enum(
        field: impl Into<String>,
        value: impl Into<String>,
        options: &[&str],
    ) -> Self {
        let value = value.into();
        let hint = suggest_option(&value, options);
        Self::InvalidEnum {
            field: field.into(),
            value,
            options: options.join(", "),
            hint,
        }
    }

    pub fn from_yaml_error(err: serde_yaml::Error, content: &str, path: Option<&str>) -> Self {
        let line = err.location().map(|loc| loc.line());
        Self::parse_error("YAML", err.to_string(), content, path, line, None)
    }

    pub fn from_toml_error(err: toml::de::Error, content: &str, path: Option<&str>) -> Self {
        let line = err
            .span()
            .map(|span| content[..span.start.min(content.len())].matches('\n').count() + 1);
        Self::parse_error("TOML", err.message().to_string(), content, path, line, None)
    }

    pub fn from_json_error(err: serde_json::Error, content: &str, path: Option<&str>) -> Self {
        let (line, column) = (err.line(), err.column());
        Self::parse_error("JSON", err.to_string(), content, path, Some(line), Some(column))
    }

    fn parse_error(
        format: &'static str,
        message: String,
        content: &str,
        path: Option<&str>,
        line: Option<usize>,
        column: Option<usize>,
    ) -> Self {
        let mut location = path.map(|p| format!(" in {}", p)).unwrap_or_default();
        let mut context = String::new();
        if let Some(line) = line.filter(|l| *l > 0) {
            location.push_str(&format!(" at line {}", line));
            context = source_excerpt(content, line, column);
        }
        Self::ParseError {
            format,
            location,
            message,
            context,
        }
    }
}

/// Up to three lines around `line` (1-based), the offending one marked with an arrow
fn source_excerpt(content: &str, line: usize, column: Option<usize>) -> String {
    let lines: Vec<&str> = content.lines().collect();
    if line > lines.len() {
        return String::new();
    }
    let start = line.saturating_sub(2);
    let end = (line + 1).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let num = start + i + 1;
            if num != line {
                return format!("  {:3} | {}", num, text);
            }
            let mut marked = format!("→ {:3} | {}", num, text);
            if let Some(col) = column.filter(|c| *c > 0) {
                marked.push_str(&format!("\n        {}^", " ".repeat(col - 1)));
            }
            marked
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn suggest_option(input: &str, options: &[&str]) -> String {
    let input = input.to_lowercase();
    options
        .iter()
        .map(|opt| (opt, edit_distance(&input, &opt.to_lowercase())))
        .min_by_key(|(_, d)| *d)
        .filter(|(_, d)| *d <= 3)
        .map(|(opt, _)| format!("Did you mean '{}'?", opt))
        .unwrap_or_else(|| "Check your configuration file".to_string())
}

/// Levenshtein distance over chars
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut curr = Vec::with_capacity(b.len() + 1);
        curr.push(i + 1);
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr.push((curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost));
        }
        prev = curr;
    }

    prev[b.len()]
}
