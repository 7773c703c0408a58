//! Error type for document accessors.

use thiserror::Error;

/// Errors raised by [`Document`](crate::Document) accessors.
///
/// Missing keys and wrong node shapes are never errors; getters fall back to
/// a zero value instead. These variants cover values that are present but
/// cannot be read as the requested type.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("value at `{key}` cannot be read as {target}: {reason}")]
    Coercion {
        key: String,
        target: &'static str,
        reason: String,
    },
    #[error("value at `{key}` does not fit in {target}")]
    OutOfRange { key: String, target: &'static str },
    #[error("no string value at `{0}` to decode as binary")]
    MissingBinary(String),
    #[error("invalid base64 at `{key}`: {source}")]
    Base64 {
        key: String,
        #[source]
        source: base64::DecodeError,
    },
    #[error("expected an object at the document root, found {0}")]
    NotAnObject(&'static str),
    #[error("structural mapping failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
