//! A document bound to one storage, for chained writes.

use documents_core::Document;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::DocumentStorage;

/// Pairs a borrowed [`Document`] with a borrowed [`DocumentStorage`].
///
/// Every write delegates to the storage's fail-soft overload and returns
/// `self`, so one document can be written to several targets in a row:
///
/// ```no_run
/// use documents::{json_storage, new_document_with, DocumentStorage};
/// use std::path::Path;
///
/// let doc = new_document_with("id", 1);
/// let text = json_storage()
///     .bind(&doc)
///     .write_path(Path::new("out/a.json"))
///     .write_path(Path::new("backup/a.json"))
///     .serialize_to_string();
/// assert!(text.is_some());
/// ```
pub struct SpecificDocumentStorage<'a, S: DocumentStorage + ?Sized> {
    document: &'a Document,
    storage: &'a S,
}

impl<'a, S: DocumentStorage + ?Sized> SpecificDocumentStorage<'a, S> {
    pub fn new(document: &'a Document, storage: &'a S) -> Self {
        Self { document, storage }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn storage(&self) -> &'a S {
        self.storage
    }

    pub fn write(&self, writer: &mut dyn Write) -> &Self {
        self.storage.write(self.document, writer);
        self
    }

    pub fn write_file(&self, file: File) -> &Self {
        self.storage.write_file(self.document, file);
        self
    }

    pub fn write_path(&self, path: &Path) -> &Self {
        self.storage.write_path(self.document, path);
        self
    }

    pub fn serialize_to_string(&self) -> Option<String> {
        self.storage.serialize_to_string(self.document)
    }
}

impl<S: DocumentStorage + ?Sized> Clone for SpecificDocumentStorage<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: DocumentStorage + ?Sized> Copy for SpecificDocumentStorage<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonDocumentStorage, YamlDocumentStorage};

    #[test]
    fn writes_chain_to_every_target() {
        let mut doc = Document::new();
        doc.append("k", "v");
        let mut first = Vec::new();
        let mut second = Vec::new();
        YamlDocumentStorage.bind(&doc).write(&mut first).write(&mut second);
        assert_eq!(first, b"k: v\n");
        assert_eq!(first, second);
    }

    #[test]
    fn works_with_dyn_storage() {
        let doc = Document::with_entry("k", 1);
        let storage: &dyn DocumentStorage = &JsonDocumentStorage;
        let bound = SpecificDocumentStorage::new(&doc, storage);
        assert_eq!(bound.serialize_to_string().as_deref(), Some("{\n  \"k\": 1\n}"));
        assert_eq!(bound.document(), &doc);
        assert_eq!(bound.storage().format(), crate::Format::Json);
    }
}
