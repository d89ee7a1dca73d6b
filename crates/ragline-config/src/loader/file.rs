//! File-based configuration loading

use crate::{error::ConfigError, loader::ConfigFormat, Config, Result, Validate};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load a file as a sparse layer holding only the keys the file sets.
///
/// The file is parsed and validated as a full config first, so type errors
/// carry line numbers and bad values are reported against this file.
pub fn load_layer<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let (format, content) = read(path)?;
    let path_str = path.to_str();
    parse_typed(format, &content, path_str)?.validate()?;

    let raw: Value = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::from_yaml_error(e, &content, path_str))?,
        ConfigFormat::Toml => ::toml::from_str(&content)
            .map_err(|e| ConfigError::from_toml_error(e, &content, path_str))?,
        ConfigFormat::Json => serde_json::from_str(&content)
            .map_err(|e| ConfigError::from_json_error(e, &content, path_str))?,
    };
    // An empty YAML document sets nothing
    Ok(match raw {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

fn read(path: &Path) -> Result<(ConfigFormat, String)> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let format = detect_format(path)?;

    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok((format, content))
}

fn parse_typed(format: ConfigFormat, content: &str, path: Option<&str>) -> Result<Config> {
    match format {
        ConfigFormat::Yaml => super::formats::yaml::parse_with_path(content, path),
        ConfigFormat::Toml => super::formats::toml::parse_with_path(content, path),
        ConfigFormat::Json => super::formats::json::parse_with_path(content, path),
    }
}

fn detect_format(path: &Path) -> Result<ConfigFormat> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yml") | Some("yaml") => Ok(ConfigFormat::Yaml),
        Some("toml") => Ok(ConfigFormat::Toml),
        Some("json") => Ok(ConfigFormat::Json),
        _ => Err(ConfigError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_detect_formats() {
        for (name, expected) in [
            ("config.yml", ConfigFormat::Yaml),
            ("config.yaml", ConfigFormat::Yaml),
            ("config.toml", ConfigFormat::Toml),
            ("config.json", ConfigFormat::Json),
        ] {
            assert_eq!(detect_format(&PathBuf::from(name)).unwrap(), expected);
        }
    }

    #[test]
    fn test_unknown_format() {
        assert!(detect_format(&PathBuf::from("config.txt")).is_err());
    }

    #[test]
    fn test_invalid_values_rejected_on_load() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "retrieval": {{ "top_k": 0 }} }}"#).unwrap();
        let err = load_layer(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInteger { .. }));
    }

    #[test]
    fn test_layer_holds_only_keys_in_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[retrieval]\ntop_k = 3\n").unwrap();
        let layer = load_layer(file.path()).unwrap();
        assert_eq!(layer, serde_json::json!({ "retrieval": { "top_k": 3 } }));
    }

    #[test]
    fn test_parse_error_carries_location() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[retrieval]\ntop_k = \"three\"\n").unwrap();
        match load_layer(file.path()).unwrap_err() {
            ConfigError::ParseError {
                format, location, ..
            } => {
                assert_eq!(format, "TOML");
                assert!(location.contains("line 2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
