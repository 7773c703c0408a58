//! The mutable key-value [`Document`].
//!
//! A document owns one object node of the JSON tree. Writers come in an
//! `append` family, one method per value kind; readers come as typed getters
//! that fall back to a zero value when the key is missing or holds a
//! non-primitive node, plus `*_or` variants that store a default first.
//!
//! # Example
//!
//! ```
//! use documents_core::Document;
//!
//! let mut doc = Document::new();
//! doc.append("name", "node-1").append("port", 8080).append("debug", true);
//!
//! assert_eq!(doc.get_int("port").unwrap(), 8080);
//! assert_eq!(doc.get_string("name").as_deref(), Some("node-1"));
//! assert_eq!(doc.get_int("missing").unwrap(), 0);
//!
//! // The default is written into the document on first use.
//! assert_eq!(doc.get_long_or("timeout", 30).unwrap(), 30);
//! assert_eq!(doc.get_long_or("timeout", 60).unwrap(), 30);
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::io::Read;

use crate::coerce::{self, is_primitive, kind_name};
use crate::error::{DocumentError, Result};
use crate::mapper::{DefaultMapper, Mapper};
use crate::options::JsonOptions;
use crate::properties::{self, Properties};

/// Mutable, insertion-ordered map of string keys to tree nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Map<String, Value>,
}

/// Values the typed getters can store as a default.
trait IntoNode {
    fn into_node(self) -> Value;
}

macro_rules! into_node_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoNode for $ty {
                fn into_node(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

into_node_via_from!(i8, i16, i32, i64, f32, f64, Number);

impl IntoNode for char {
    fn into_node(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoNode for i128 {
    fn into_node(self) -> Value {
        if let Ok(i) = i64::try_from(self) {
            Value::from(i)
        } else if let Ok(u) = u64::try_from(self) {
            Value::from(u)
        } else {
            // Out of the tree's integer range; get_big_integer parses it back.
            Value::String(self.to_string())
        }
    }
}

/// Generates a fallible typed getter and its `*_or` companion for each
/// primitive target.
macro_rules! typed_getters {
    ($($(#[$meta:meta])* $get:ident, $get_or:ident -> $ty:ty = $coerce:path;)*) => {
        $(
            $(#[$meta])*
            pub fn $get(&self, key: &str) -> Result<$ty> {
                match self.primitive(key) {
                    Some(value) => $coerce(key, value),
                    None => Ok(<$ty>::default()),
                }
            }

            #[doc = concat!(
                "Like [`Document::", stringify!($get), "`], but first stores `default` ",
                "when `key` is absent."
            )]
            pub fn $get_or(&mut self, key: &str, default: $ty) -> Result<$ty> {
                self.store_default(key, default.into_node());
                self.$get(key)
            }
        )*
    };
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Wraps an object node.
    ///
    /// # Errors
    ///
    /// [`DocumentError::NotAnObject`] for any other node kind.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DocumentError::NotAnObject(kind_name(&other))),
        }
    }

    /// Maps a typed value into a document with the [`DefaultMapper`].
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Self::from_serializable_with(value, &DefaultMapper)
    }

    pub fn from_serializable_with<T: Serialize + ?Sized, M: Mapper>(
        value: &T,
        mapper: &M,
    ) -> Result<Self> {
        Self::from_value(mapper.to_tree(value)?)
    }

    /// Creates a document holding a single entry.
    pub fn with_entry<'k>(key: impl Into<Option<&'k str>>, value: impl Into<Value>) -> Self {
        let mut document = Self::new();
        document.append(key, value);
        document
    }

    /// Creates a document with one string member per property.
    pub fn from_properties(properties: &Properties) -> Self {
        let mut document = Self::new();
        document.merge_properties(properties);
        document
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    // ── Mapping operations ─────────────────────────────────────────────────

    /// Snapshot of the top-level keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.root.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.root.clear();
        self
    }

    /// Removes `key` if present, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.root.shift_remove(key);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Iterates over `(key, node)` pairs in insertion order.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.root.iter()
    }

    // ── Writers ────────────────────────────────────────────────────────────

    fn put(&mut self, key: &str, value: Value) {
        if !value.is_null() {
            self.root.insert(key.to_owned(), value);
        }
    }

    fn store_default(&mut self, key: &str, value: Value) {
        if !self.contains(key) {
            self.put(key, value);
        }
    }

    /// Stores `value` under `key`, replacing any previous node.
    ///
    /// A `None` key, or a value that converts to `null` (such as `None` or a
    /// non-finite float), leaves the document untouched.
    ///
    /// ```
    /// use documents_core::Document;
    ///
    /// let mut doc = Document::new();
    /// doc.append("a", 1).append("b", None::<i32>).append(None::<&str>, 2);
    /// assert_eq!(doc.keys(), vec!["a"]);
    /// ```
    pub fn append<'k>(&mut self, key: impl Into<Option<&'k str>>, value: impl Into<Value>) -> &mut Self {
        if let Some(key) = key.into() {
            self.put(key, value.into());
        }
        self
    }

    /// Stores a character as a one-character string.
    pub fn append_char<'k>(&mut self, key: impl Into<Option<&'k str>>, value: char) -> &mut Self {
        self.append(key, value.into_node())
    }

    /// Stores bytes as a padded standard Base64 string.
    pub fn append_binary<'k>(&mut self, key: impl Into<Option<&'k str>>, bytes: &[u8]) -> &mut Self {
        self.append(key, STANDARD.encode(bytes))
    }

    /// Stores a copy of `document` as a nested object. Later changes to
    /// either document do not affect the other.
    pub fn append_document<'k>(&mut self, key: impl Into<Option<&'k str>>, document: &Document) -> &mut Self {
        self.append(key, Value::Object(document.root.clone()))
    }

    /// Stores a properties table as a nested object.
    pub fn append_properties<'k>(
        &mut self,
        key: impl Into<Option<&'k str>>,
        properties: &Properties,
    ) -> &mut Self {
        let nested = Document::from_properties(properties);
        self.append_document(key, &nested)
    }

    /// Stores any `Serialize` value, mapped with the [`DefaultMapper`].
    pub fn append_serialized<'k, T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<Option<&'k str>>,
        value: &T,
    ) -> Result<&mut Self> {
        self.append_serialized_with(key, value, &DefaultMapper)
    }

    pub fn append_serialized_with<'k, T: Serialize + ?Sized, M: Mapper>(
        &mut self,
        key: impl Into<Option<&'k str>>,
        value: &T,
        mapper: &M,
    ) -> Result<&mut Self> {
        if let Some(key) = key.into() {
            let node = mapper.to_tree(value)?;
            self.put(key, node);
        }
        Ok(self)
    }

    // ── Bulk merges ────────────────────────────────────────────────────────

    /// Copies every top-level member of `other` into this document,
    /// overwriting members with the same key.
    pub fn merge(&mut self, other: &Document) -> &mut Self {
        for (key, value) in &other.root {
            self.root.insert(key.clone(), value.clone());
        }
        self
    }

    /// Moves every member of `map` into this document, overwriting members
    /// with the same key.
    pub fn merge_map(&mut self, map: Map<String, Value>) -> &mut Self {
        for (key, value) in map {
            self.root.insert(key, value);
        }
        self
    }

    /// Appends each `(key, value)` pair with [`Document::append_serialized`].
    pub fn merge_entries<I, K, V>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Serialize,
    {
        for (key, value) in entries {
            self.append_serialized(key.as_ref(), &value)?;
        }
        Ok(self)
    }

    /// Appends each property as a string member.
    pub fn merge_properties(&mut self, properties: &Properties) -> &mut Self {
        for (key, value) in properties {
            self.append(key.as_str(), value.as_str());
        }
        self
    }

    /// Parses a JSON object from `reader` and merges its members.
    pub fn merge_json_reader<R: Read>(&mut self, reader: R) -> Result<&mut Self> {
        let value: Value = serde_json::from_reader(reader)?;
        let other = Document::from_value(value)?;
        Ok(self.merge_map(other.root))
    }

    // ── Readers ────────────────────────────────────────────────────────────

    /// Borrows the raw node at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    fn primitive(&self, key: &str) -> Option<&Value> {
        self.root.get(key).filter(|value| is_primitive(value))
    }

    typed_getters! {
        /// Reads `key` as `i32`; `0` when absent or not a primitive.
        ///
        /// # Errors
        ///
        /// A present primitive that does not parse or fit.
        get_int, get_int_or -> i32 = coerce::to_int;
        /// Reads `key` as `i64`; `0` when absent or not a primitive.
        get_long, get_long_or -> i64 = coerce::to_long;
        /// Reads `key` as `i16`; `0` when absent or not a primitive.
        get_short, get_short_or -> i16 = coerce::to_short;
        /// Reads `key` as `i8`; `0` when absent or not a primitive.
        get_byte, get_byte_or -> i8 = coerce::to_byte;
        /// Reads `key` as `f64`; `0.0` when absent or not a primitive.
        get_double, get_double_or -> f64 = coerce::to_double;
        /// Reads `key` as `f32`; `0.0` when absent or not a primitive.
        get_float, get_float_or -> f32 = coerce::to_float;
        /// Reads the first character at `key`; `'\0'` when absent or not a
        /// primitive.
        get_char, get_char_or -> char = coerce::to_char;
    }

    /// Reads `key` as a boolean; `false` when absent or not a primitive.
    pub fn get_boolean(&self, key: &str) -> bool {
        self.primitive(key).is_some_and(coerce::to_boolean)
    }

    pub fn get_boolean_or(&mut self, key: &str, default: bool) -> bool {
        self.store_default(key, Value::Bool(default));
        self.get_boolean(key)
    }

    /// Renders the primitive at `key` as a string; `None` when absent or not
    /// a primitive.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.primitive(key).and_then(coerce::to_string)
    }

    pub fn get_string_or(&mut self, key: &str, default: &str) -> Option<String> {
        self.store_default(key, Value::from(default));
        self.get_string(key)
    }

    /// Reads `key` as an integer wider than the tree's native range.
    pub fn get_big_integer(&self, key: &str) -> Result<Option<i128>> {
        self.primitive(key)
            .map(|value| coerce::to_big_integer(key, value))
            .transpose()
    }

    pub fn get_big_integer_or(&mut self, key: &str, default: i128) -> Result<Option<i128>> {
        self.store_default(key, default.into_node());
        self.get_big_integer(key)
    }

    /// Reads `key` as an exact JSON number, parsing strings.
    pub fn get_big_decimal(&self, key: &str) -> Result<Option<Number>> {
        self.primitive(key)
            .map(|value| coerce::to_big_decimal(key, value))
            .transpose()
    }

    pub fn get_big_decimal_or(&mut self, key: &str, default: Number) -> Result<Option<Number>> {
        self.store_default(key, default.into_node());
        self.get_big_decimal(key)
    }

    /// Copies the nested object at `key` out as a document.
    pub fn get_document(&self, key: &str) -> Option<Document> {
        match self.root.get(key) {
            Some(Value::Object(map)) => Some(Document::from_map(map.clone())),
            _ => None,
        }
    }

    pub fn get_document_or(&mut self, key: &str, default: &Document) -> Option<Document> {
        self.store_default(key, Value::Object(default.root.clone()));
        self.get_document(key)
    }

    /// Collects the object elements of the array at `key`, in order.
    /// Elements of any other kind are skipped.
    pub fn get_documents(&self, key: &str) -> Option<Vec<Document>> {
        match self.root.get(key) {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(Document::from_map(map.clone())),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn get_documents_or(&mut self, key: &str, default: &[Document]) -> Option<Vec<Document>> {
        let nodes = default
            .iter()
            .map(|document| Value::Object(document.root.clone()))
            .collect();
        self.store_default(key, Value::Array(nodes));
        self.get_documents(key)
    }

    pub fn get_json_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.root.get(key).and_then(Value::as_array)
    }

    pub fn get_json_array_or(&mut self, key: &str, default: Vec<Value>) -> Option<&Vec<Value>> {
        self.store_default(key, Value::Array(default));
        self.get_json_array(key)
    }

    pub fn get_json_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.root.get(key).and_then(Value::as_object)
    }

    pub fn get_json_object_or(
        &mut self,
        key: &str,
        default: Map<String, Value>,
    ) -> Option<&Map<String, Value>> {
        self.store_default(key, Value::Object(default));
        self.get_json_object(key)
    }

    /// Exports the nested object at `key` as properties.
    pub fn get_properties(&self, key: &str) -> Option<Properties> {
        self.get_json_object(key).map(properties::to_properties)
    }

    pub fn get_properties_or(&mut self, key: &str, default: &Properties) -> Option<Properties> {
        if !self.contains(key) {
            self.append_properties(key, default);
        }
        self.get_properties(key)
    }

    /// Decodes the Base64 string at `key`.
    ///
    /// # Errors
    ///
    /// [`DocumentError::MissingBinary`] when the key is absent or does not
    /// hold a string, [`DocumentError::Base64`] when the string is not valid
    /// Base64.
    pub fn get_binary(&self, key: &str) -> Result<Vec<u8>> {
        match self.root.get(key) {
            Some(Value::String(encoded)) => {
                STANDARD
                    .decode(encoded)
                    .map_err(|source| DocumentError::Base64 {
                        key: key.to_owned(),
                        source,
                    })
            }
            _ => Err(DocumentError::MissingBinary(key.to_owned())),
        }
    }

    pub fn get_binary_or(&mut self, key: &str, default: &[u8]) -> Result<Vec<u8>> {
        if !self.contains(key) {
            self.append_binary(key, default);
        }
        self.get_binary(key)
    }

    /// Maps the node at `key` into `T` with the [`DefaultMapper`].
    /// `Ok(None)` when the key is absent or holds `null`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get_as_with(key, &DefaultMapper)
    }

    pub fn get_as_with<T: DeserializeOwned, M: Mapper>(&self, key: &str, mapper: &M) -> Result<Option<T>> {
        match self.root.get(key) {
            Some(Value::Null) | None => Ok(None),
            Some(node) => mapper.from_tree(node.clone()).map(Some),
        }
    }

    pub fn get_as_or<T: Serialize + DeserializeOwned>(&mut self, key: &str, default: &T) -> Result<Option<T>> {
        if !self.contains(key) {
            self.append_serialized(key, default)?;
        }
        self.get_as(key)
    }

    /// Maps the whole document into `T` with the [`DefaultMapper`].
    pub fn to_instance_of<T: DeserializeOwned>(&self) -> Result<T> {
        self.to_instance_of_with(&DefaultMapper)
    }

    pub fn to_instance_of_with<T: DeserializeOwned, M: Mapper>(&self, mapper: &M) -> Result<T> {
        mapper.from_tree(Value::Object(self.root.clone()))
    }

    // ── Serialization ──────────────────────────────────────────────────────

    /// Compact JSON using the global [`JsonOptions`].
    pub fn to_json(&self) -> String {
        self.to_json_with(JsonOptions::global())
    }

    pub fn to_json_with(&self, options: &JsonOptions) -> String {
        options.to_string(&self.root)
    }

    /// Indented JSON using the global [`JsonOptions`].
    pub fn to_pretty_json(&self) -> String {
        self.to_pretty_json_with(JsonOptions::global())
    }

    pub fn to_pretty_json_with(&self, options: &JsonOptions) -> String {
        options.to_string_pretty(&self.root)
    }

    /// UTF-8 bytes of [`Document::to_json`].
    pub fn to_byte_array(&self) -> Vec<u8> {
        self.to_json().into_bytes()
    }

    /// Exports every top-level member as a property.
    pub fn to_properties(&self) -> Properties {
        properties::to_properties(&self.root)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl From<Map<String, Value>> for Document {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        document.into_value()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a String;
    type IntoIter = serde_json::map::Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.root.keys()
    }
}
