//! Error types for configuration loading and merging

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or merging a configuration document
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base configuration file could not be read
    #[error("read file error: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Base configuration is not valid JSON once comments are removed
    #[error("unmarshal config json error: {0}")]
    Parse(#[source] serde_json::Error),

    /// A managed path is missing or is not an object
    #[error("expected {path} to be an object, got {found}")]
    Structural { path: String, found: &'static str },

    /// Merged document could not be serialized
    #[error("marshal config json error: {0}")]
    Serialize(#[source] serde_json::Error),
}
