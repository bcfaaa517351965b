//! Error types for channel plan sources

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a channel plan
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server address cannot be turned into a URL
    #[error("invalid server address {address}: {reason}")]
    InvalidServer { address: String, reason: String },

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    Client(#[source] reqwest::Error),

    /// Request failed in transport
    #[error("get configuration error: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("get configuration error: server returned {0}")]
    Status(reqwest::StatusCode),

    /// Response body is not a valid configuration
    #[error("decode configuration error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Local plan file could not be read
    #[error("read file error: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
