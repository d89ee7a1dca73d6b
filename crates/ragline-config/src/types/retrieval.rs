//! Retrieval configuration

use serde::{Deserialize, Serialize};

/// Retrieval behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_top_k("retrieval.top_k", self.top_k)
    }
}

fn default_top_k() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn test_zero_top_k_invalid() {
        let config = RetrievalConfig { top_k: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_large_top_k_invalid() {
        let config = RetrievalConfig { top_k: 2000 };
        assert!(config.validate().is_err());
    }
}
