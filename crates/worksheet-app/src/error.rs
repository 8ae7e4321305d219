//! Host error type.

use std::path::PathBuf;
use thiserror::Error;
use worksheet_core::{ConfigError, DocumentError, StorageError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Step {index}: unknown key {name:?}")]
    UnknownKey { index: usize, name: String },
}

pub type AppResult<T> = Result<T, AppError>;
