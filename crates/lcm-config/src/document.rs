//! Configuration document loading
//!
//! Base configurations are JSON with optional `/* ... */` comments, which
//! are removed before parsing. Objects keep their key order so the output
//! reads like the file the operator wrote.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;

/// Remove `/* ... */` comments outside of string literals
///
/// Newlines inside comments are kept so parse errors still point at the
/// right line. An unterminated comment runs to the end of the input.
pub fn strip_block_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Parse a configuration document from text
pub fn parse_document(text: &str) -> Result<Value, ConfigError> {
    serde_json::from_str(&strip_block_comments(text)).map_err(ConfigError::Parse)
}

/// Read and parse a configuration document from disk
pub fn load_document(path: &Path) -> Result<Value, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "configuration loaded");
    parse_document(&text)
}

/// Serialize a document for the packet-forwarder
pub fn render_document(document: &Value) -> Result<Vec<u8>, ConfigError> {
    let mut out = serde_json::to_vec_pretty(document).map_err(ConfigError::Serialize)?;
    out.push(b'\n');
    Ok(out)
}
