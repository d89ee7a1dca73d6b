//! Configuration merging logic
//!
//! Every layer is a sparse JSON tree holding only the fields that layer set.
//! Layers are deep-merged onto the serialized defaults: objects merge key by
//! key, anything else (scalars, arrays) is replaced wholesale.

use crate::{error::ConfigError, Config, Result};
use serde_json::Value;

/// The defaults as a full tree, the bottom of every merge
pub fn defaults() -> Result<Value> {
    to_tree(&Config::default())
}

/// Serialize a complete config into a tree
pub fn to_tree(config: &Config) -> Result<Value> {
    serde_json::to_value(config).map_err(|e| ConfigError::ValidationError {
        field: "config".to_string(),
        message: format!("cannot serialize configuration: {}", e),
    })
}

/// Deep-merge `overlay` into `base`; fields present in `overlay` win.
pub fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Turn a merged tree back into a typed config.
pub fn into_config(tree: Value) -> Result<Config> {
    let rendered = tree.to_string();
    serde_json::from_value(tree).map_err(|e| ConfigError::from_json_error(e, &rendered, None))
}
