//! Readers and writers that move documents between text and the tree model.
//!
//! A format implements two operations, [`DocumentStorage::read_from`] and
//! [`DocumentStorage::write_to`], both over plain byte streams. Every other
//! overload (strings, byte slices, files, paths) is derived from those two.
//!
//! The derived overloads are fail-soft: errors are reported through
//! `tracing::error!` and turned into `None` (reads) or an early return
//! (writes). Callers that want the error use the core operations or the
//! `try_*` helpers.

pub mod json;
pub mod specific;
pub mod yaml;

use documents_core::Document;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::Result;

pub use json::JsonDocumentStorage;
pub use specific::SpecificDocumentStorage;
pub use yaml::YamlDocumentStorage;

/// Text encoding handled by a storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Guesses the format from a file extension (`json`, `yml`, `yaml`).
    pub fn from_path(path: &Path) -> Option<Format> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("json") {
            Some(Format::Json)
        } else if extension.eq_ignore_ascii_case("yml") || extension.eq_ignore_ascii_case("yaml") {
            Some(Format::Yaml)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stateless reader/writer for one text format.
pub trait DocumentStorage {
    fn format(&self) -> Format;

    /// Parses one document from `reader`. The root must be an object.
    fn read_from(&self, reader: &mut dyn Read) -> Result<Document>;

    /// Serializes `document` into `writer`.
    fn write_to(&self, document: &Document, writer: &mut dyn Write) -> Result<()>;

    /// Fail-soft [`DocumentStorage::read_from`].
    fn read(&self, reader: &mut dyn Read) -> Option<Document> {
        match self.read_from(reader) {
            Ok(document) => Some(document),
            Err(err) => {
                tracing::error!(format = %self.format(), error = %err, "failed to read document");
                None
            }
        }
    }

    fn read_str(&self, input: &str) -> Option<Document> {
        self.read(&mut input.as_bytes())
    }

    fn read_bytes(&self, mut bytes: &[u8]) -> Option<Document> {
        self.read(&mut bytes)
    }

    /// Reads an already opened file. The file is closed before returning.
    fn read_file(&self, file: File) -> Option<Document> {
        self.read(&mut BufReader::new(file))
    }

    fn try_read_path(&self, path: &Path) -> Result<Document> {
        let file = File::open(path)?;
        self.read_from(&mut BufReader::new(file))
    }

    fn read_path(&self, path: &Path) -> Option<Document> {
        match self.try_read_path(path) {
            Ok(document) => Some(document),
            Err(err) => {
                tracing::error!(
                    format = %self.format(),
                    path = %path.display(),
                    error = %err,
                    "failed to read document"
                );
                None
            }
        }
    }

    /// Fail-soft [`DocumentStorage::write_to`].
    fn write(&self, document: &Document, writer: &mut dyn Write) {
        if let Err(err) = self.write_to(document, writer) {
            tracing::error!(format = %self.format(), error = %err, "failed to write document");
        }
    }

    /// Writes into an already opened file, flushing and closing it before
    /// returning.
    fn write_file(&self, document: &Document, file: File) {
        let mut writer = BufWriter::new(file);
        let result = self
            .write_to(document, &mut writer)
            .and_then(|()| writer.flush().map_err(Into::into));
        if let Err(err) = result {
            tracing::error!(format = %self.format(), error = %err, "failed to write document");
        }
    }

    /// Writes to `path`, creating missing parent directories and truncating
    /// an existing file.
    fn try_write_path(&self, document: &Document, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(document, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_path(&self, document: &Document, path: &Path) {
        if let Err(err) = self.try_write_path(document, path) {
            tracing::error!(
                format = %self.format(),
                path = %path.display(),
                error = %err,
                "failed to write document"
            );
        }
    }

    fn serialize_to_bytes(&self, document: &Document) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        match self.write_to(document, &mut buf) {
            Ok(()) => Some(buf),
            Err(err) => {
                tracing::error!(format = %self.format(), error = %err, "failed to serialize document");
                None
            }
        }
    }

    fn serialize_to_string(&self, document: &Document) -> Option<String> {
        let bytes = self.serialize_to_bytes(document)?;
        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::error!(format = %self.format(), error = %err, "serialized document is not UTF-8");
                None
            }
        }
    }

    /// Pairs this storage with `document` for chained writes.
    fn bind<'a>(&'a self, document: &'a Document) -> SpecificDocumentStorage<'a, Self>
    where
        Self: Sized,
    {
        SpecificDocumentStorage::new(document, self)
    }
}
