//! Error types for fallible boundaries.
//!
//! Editing operations never fail; they return `bool` or `Option` and leave
//! state untouched. Errors only arise when decoding external data.

use thiserror::Error;

/// Document snapshot encode/decode errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document has no pages")]
    Empty,
}

/// Configuration load errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}
