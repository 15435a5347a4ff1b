//! Read a YAML configuration document from disk.
use std::path::Path;

use super::value::Value;
use crate::error::ConfigError;

/// Load and parse the YAML document at `path`.
///
/// An empty document yields an empty mapping.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Parse`] if it is not valid YAML, and
/// [`ConfigError::NotAMapping`] if the root is not a mapping.
pub fn load(path: &Path) -> Result<Value, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

/// Parse YAML `text`; `origin` is only used in diagnostics.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] or [`ConfigError::NotAMapping`].
pub fn parse(text: &str, origin: &Path) -> Result<Value, ConfigError> {
    if text.trim().is_empty() {
        return Ok(Value::Map(Vec::new()));
    }
    let raw: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    match Value::from(raw) {
        root @ Value::Map(_) => Ok(root),
        Value::Null => Ok(Value::Map(Vec::new())),
        other => Err(ConfigError::NotAMapping {
            path: origin.to_path_buf(),
            found: other.kind(),
        }),
    }
}
