//! JSON storage: the tree maps onto JSON text one to one.

use documents_core::{Document, JsonOptions};
use serde_json::Value;
use std::io::{BufReader, Read, Write};

use super::{DocumentStorage, Format};
use crate::error::Result;

/// Reads JSON objects and writes indented JSON using the global
/// [`JsonOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonDocumentStorage;

impl DocumentStorage for JsonDocumentStorage {
    fn format(&self) -> Format {
        Format::Json
    }

    fn read_from(&self, reader: &mut dyn Read) -> Result<Document> {
        let value: Value = serde_json::from_reader(BufReader::new(reader))?;
        Ok(Document::from_value(value)?)
    }

    fn write_to(&self, document: &Document, writer: &mut dyn Write) -> Result<()> {
        JsonOptions::global().write_pretty(document.as_map(), writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use serde_json::json;

    #[test]
    fn reads_objects() {
        let doc = JsonDocumentStorage
            .read_str(r#"{"name": "x", "tags": ["a", "b"], "n": null}"#)
            .unwrap();
        assert_eq!(doc.keys(), vec!["name", "tags", "n"]);
        assert_eq!(doc.get("n"), Some(&Value::Null));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = JsonDocumentStorage.read_from(&mut "[1, 2]".as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::Document(_)));
        assert!(JsonDocumentStorage.read_str("42").is_none());
    }

    #[test]
    fn malformed_input_reads_as_none() {
        assert!(JsonDocumentStorage.read_str("{\"a\": ").is_none());
        assert!(JsonDocumentStorage.read_str("").is_none());
        assert!(JsonDocumentStorage.read_bytes(&[0xff, 0xfe]).is_none());
    }

    #[test]
    fn writes_pretty_json() {
        let doc = Document::from_value(json!({"a": 1, "b": null})).unwrap();
        let text = JsonDocumentStorage.serialize_to_string(&doc).unwrap();
        assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": null\n}");
    }

    #[test]
    fn unicode_survives() {
        let mut doc = Document::new();
        doc.append("greeting", "grüße, 世界");
        let bytes = JsonDocumentStorage.serialize_to_bytes(&doc).unwrap();
        let back = JsonDocumentStorage.read_bytes(&bytes).unwrap();
        assert_eq!(back, doc);
    }
}
