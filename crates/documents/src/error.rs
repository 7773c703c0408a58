//! Error type for storage operations.

use documents_core::DocumentError;
use std::io;
use thiserror::Error;

/// Errors raised by the fail-hard storage operations
/// ([`DocumentStorage::read_from`](crate::DocumentStorage::read_from),
/// [`DocumentStorage::write_to`](crate::DocumentStorage::write_to) and the
/// `try_*` helpers).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
