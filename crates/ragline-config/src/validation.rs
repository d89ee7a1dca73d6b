//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Upper bound on any configured result count
pub const MAX_TOP_K: usize = 1000;

/// Trait for validating configuration values
///
/// Implement this trait for any config type that needs validation beyond
/// type-level checks. Errors name the offending field.
pub trait Validate {
    /// Returns `Ok(())` if validation passes, or a `ConfigError` describing
    /// what failed and why.
    fn validate(&self) -> Result<()>;
}

/// Helper function to validate value is within range
pub fn validate_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Helper function to validate integer is above minimum
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// A result count must be at least 1 and at most [`MAX_TOP_K`]
pub fn validate_top_k(field: impl Into<String>, value: usize) -> Result<()> {
    let field = field.into();
    validate_positive(field.clone(), value, 0)?;
    if value > MAX_TOP_K {
        return Err(ConfigError::ValidationError {
            field,
            message: format!("top_k too large ({}), use <= {}", value, MAX_TOP_K),
        });
    }
    Ok(())
}

/// API base URLs must be non-empty http(s) URLs
pub fn validate_url(field: impl Into<String>, value: &str) -> Result<()> {
    let field = field.into();
    if value.is_empty() {
        return Err(ConfigError::ValidationError {
            field,
            message: "API base URL cannot be empty string (use null to unset)".to_string(),
        });
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::ValidationError {
            field,
            message: format!(
                "API base must start with http:// or https://, got: {}",
                value
            ),
        });
    }
    Ok(())
}
