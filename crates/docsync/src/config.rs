//! Controller configuration.
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! debounce_ms = 300
//! json_indent = 2
//! require_mapping_root = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::codec::SerializeOptions;

/// Environment variable naming a TOML config file for the command line tools.
pub const CONFIG_ENV: &str = "DOCSYNC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Quiet period after the last text edit before the text is parsed.
    pub debounce_ms: u64,
    /// Spaces per JSON indentation level when republishing; `0` is compact.
    pub json_indent: usize,
    /// Treat a document whose root is not a mapping as a parse error.
    pub require_mapping_root: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            json_indent: 2,
            require_mapping_root: true,
        }
    }
}

impl SyncConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from the file named by [`CONFIG_ENV`], or defaults if unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            json_indent: self.json_indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(SyncConfig::from_toml_str("").unwrap(), SyncConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = SyncConfig::from_toml_str("debounce_ms = 50\njson_indent = 0\n").unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.serialize_options().json_indent, 0);
        assert!(config.require_mapping_root);
    }

    #[test]
    fn bad_toml_is_an_error() {
        let err = SyncConfig::from_toml_str("debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = SyncConfig::from_file("/nonexistent/docsync.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/docsync.toml"));
    }
}
