//! documents - JSON and YAML storage for [`Document`]s.
//!
//! Re-exports [`documents_core`] and adds the storages plus a set of
//! constructor functions that dispatch to them.
//!
//! Reading is fail-soft: malformed input or I/O errors are logged through
//! `tracing` and come back as `None`. Call [`logging::init`] to see them on
//! stderr.
//!
//! # Example
//!
//! ```
//! use documents::{new_json_document, yaml_storage, DocumentStorage};
//!
//! let mut doc = new_json_document(r#"{"name": "svc", "replicas": 3, "owner": null}"#).unwrap();
//! doc.append("ports", vec![80, 443]);
//!
//! let yaml = yaml_storage().serialize_to_string(&doc).unwrap();
//! assert_eq!(yaml, "name: svc\nreplicas: 3\nports:\n- 80\n- 443\n");
//!
//! assert!(new_json_document("not json").is_none());
//! ```

pub mod error;
pub mod logging;
pub mod storage;

pub use documents_core::{
    coerce, mapper, options, properties, DefaultMapper, Document, DocumentError, JsonOptions,
    Mapper, Properties,
};
pub use error::StorageError;
pub use storage::{
    DocumentStorage, Format, JsonDocumentStorage, SpecificDocumentStorage, YamlDocumentStorage,
};

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

static JSON: JsonDocumentStorage = JsonDocumentStorage;
static YAML: YamlDocumentStorage = YamlDocumentStorage;

/// The shared JSON storage.
pub fn json_storage() -> &'static JsonDocumentStorage {
    &JSON
}

/// The shared YAML storage.
pub fn yaml_storage() -> &'static YamlDocumentStorage {
    &YAML
}

/// The shared storage for `format`.
pub fn storage_for(format: Format) -> &'static dyn DocumentStorage {
    match format {
        Format::Json => &JSON,
        Format::Yaml => &YAML,
    }
}

pub fn new_document() -> Document {
    Document::new()
}

/// Wraps an object node; any other node kind yields `None`.
pub fn new_document_from_value(value: Value) -> Option<Document> {
    Document::from_value(value).ok()
}

pub fn new_document_from_map(map: Map<String, Value>) -> Document {
    Document::from_map(map)
}

pub fn new_document_with<'k>(key: impl Into<Option<&'k str>>, value: impl Into<Value>) -> Document {
    Document::with_entry(key, value)
}

/// Maps a typed value into a document. Values that do not map to an object
/// yield `None`.
pub fn new_document_from<T: Serialize + ?Sized>(value: &T) -> Option<Document> {
    match Document::from_serializable(value) {
        Ok(document) => Some(document),
        Err(err) => {
            tracing::error!(error = %err, "failed to map value into a document");
            None
        }
    }
}

pub fn new_json_document(input: &str) -> Option<Document> {
    JSON.read_str(input)
}

pub fn new_json_document_from_bytes(bytes: &[u8]) -> Option<Document> {
    JSON.read_bytes(bytes)
}

pub fn new_json_document_from_path(path: &Path) -> Option<Document> {
    JSON.read_path(path)
}

pub fn new_yaml_document(input: &str) -> Option<Document> {
    YAML.read_str(input)
}

pub fn new_yaml_document_from_bytes(bytes: &[u8]) -> Option<Document> {
    YAML.read_bytes(bytes)
}

pub fn new_yaml_document_from_path(path: &Path) -> Option<Document> {
    YAML.read_path(path)
}

/// Reads `path` with the storage its extension names; `None` for unknown
/// extensions.
pub fn read_document(path: &Path) -> Option<Document> {
    match Format::from_path(path) {
        Some(format) => storage_for(format).read_path(path),
        None => {
            tracing::error!(path = %path.display(), "no storage for file extension");
            None
        }
    }
}
