//! YAML storage.
//!
//! Writing converts the tree into plain YAML nodes first: objects become
//! ordered mappings, arrays become sequences, primitives become scalars and
//! `null` nodes are dropped from whatever container holds them. The result
//! is emitted in block style.
//!
//! Reading decodes generic YAML nodes and maps them into the tree with the
//! [`DefaultMapper`]. The root must be a mapping.

use documents_core::{DefaultMapper, Document, Mapper};
use serde_json::{Number, Value};
use serde_yaml::{Mapping, Value as YamlValue};
use std::cell::RefCell;
use std::io::{Read, Write};

use super::{DocumentStorage, Format};
use crate::error::Result;

thread_local! {
    static ENGINE: RefCell<YamlEngine> = RefCell::new(YamlEngine::default());
}

/// Capacity a thread's buffer keeps between calls.
const RETAINED_CAPACITY: usize = 64 * 1024;

/// Per-thread scratch space for parsing and emission.
#[derive(Default)]
struct YamlEngine {
    buffer: Vec<u8>,
}

impl YamlEngine {
    fn emit(&mut self, node: &YamlValue, writer: &mut dyn Write) -> Result<()> {
        self.buffer.clear();
        let result: Result<()> = serde_yaml::to_writer(&mut self.buffer, node)
            .map_err(Into::into)
            .and_then(|()| writer.write_all(&self.buffer).map_err(Into::into));
        self.release();
        result
    }

    fn parse(&mut self, reader: &mut dyn Read) -> Result<YamlValue> {
        self.buffer.clear();
        let result: Result<YamlValue> = match reader.read_to_end(&mut self.buffer) {
            Ok(_) => serde_yaml::from_slice(&self.buffer).map_err(Into::into),
            Err(err) => Err(err.into()),
        };
        self.release();
        result
    }

    fn release(&mut self) {
        self.buffer.clear();
        self.buffer.shrink_to(RETAINED_CAPACITY);
    }
}

fn with_engine<T>(f: impl FnOnce(&mut YamlEngine) -> T) -> T {
    ENGINE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut engine) => f(&mut *engine),
        // Re-entered from a reader or writer running on this thread.
        Err(_) => f(&mut YamlEngine::default()),
    })
}

/// Reads and writes block-style YAML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlDocumentStorage;

impl DocumentStorage for YamlDocumentStorage {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn read_from(&self, reader: &mut dyn Read) -> Result<Document> {
        let node = with_engine(|engine| engine.parse(reader))?;
        let tree = DefaultMapper.to_tree(&node)?;
        Ok(Document::from_value(tree)?)
    }

    fn write_to(&self, document: &Document, writer: &mut dyn Write) -> Result<()> {
        let mut root = Mapping::with_capacity(document.len());
        for (key, value) in document.iter() {
            if let Some(plain) = to_plain(value) {
                root.insert(YamlValue::String(key.clone()), plain);
            }
        }
        let root = YamlValue::Mapping(root);
        with_engine(|engine| engine.emit(&root, writer))
    }
}

/// Converts a tree node into a plain YAML node. `null` yields `None`, and
/// the caller leaves it out of the parent container.
pub fn to_plain(node: &Value) -> Option<YamlValue> {
    match node {
        Value::Null => None,
        Value::Bool(b) => Some(YamlValue::Bool(*b)),
        Value::Number(n) => Some(YamlValue::Number(plain_number(n))),
        Value::String(s) => Some(YamlValue::String(s.clone())),
        Value::Array(items) => Some(YamlValue::Sequence(items.iter().filter_map(to_plain).collect())),
        Value::Object(map) => {
            let mut mapping = Mapping::with_capacity(map.len());
            for (key, value) in map {
                if let Some(plain) = to_plain(value) {
                    mapping.insert(YamlValue::String(key.clone()), plain);
                }
            }
            Some(YamlValue::Mapping(mapping))
        }
    }
}

fn plain_number(n: &Number) -> serde_yaml::Number {
    if let Some(i) = n.as_i64() {
        i.into()
    } else if let Some(u) = n.as_u64() {
        u.into()
    } else {
        n.as_f64().unwrap_or(f64::NAN).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn emits_block_style() {
        let text = YamlDocumentStorage
            .serialize_to_string(&doc(json!({"name": "x", "list": [1, 2], "nested": {"a": true}})))
            .unwrap();
        assert_eq!(text, "name: x\nlist:\n- 1\n- 2\nnested:\n  a: true\n");
    }

    #[test]
    fn nulls_are_left_out() {
        let text = YamlDocumentStorage
            .serialize_to_string(&doc(json!({"a": 1, "gone": null, "inner": {"gone": null}})))
            .unwrap();
        assert_eq!(text, "a: 1\ninner: {}\n");
    }

    #[test]
    fn nulls_are_left_out_of_sequences() {
        assert_eq!(
            to_plain(&json!([1, null, 2])),
            Some(YamlValue::Sequence(vec![1.into(), 2.into()]))
        );
    }

    #[test]
    fn numeric_looking_strings_stay_strings() {
        let original = doc(json!({"zip": "01234", "flag": "true", "n": 7}));
        let text = YamlDocumentStorage.serialize_to_string(&original).unwrap();
        let back = YamlDocumentStorage.read_str(&text).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn reads_mappings() {
        let back = YamlDocumentStorage
            .read_str("server:\n  host: example.org\n  port: 443\nmirrors:\n  - a\n  - b\n")
            .unwrap();
        assert_eq!(back.get_document("server").unwrap().get_int("port").unwrap(), 443);
        assert_eq!(back.get("mirrors"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn non_mapping_root_reads_as_none() {
        assert!(YamlDocumentStorage.read_str("- 1\n- 2\n").is_none());
        assert!(YamlDocumentStorage.read_str("just a scalar").is_none());
        assert!(YamlDocumentStorage.read_str("").is_none());
        assert!(YamlDocumentStorage.read_str("a: [1, 2").is_none());
    }

    #[test]
    fn engine_buffer_shrinks_after_large_documents() {
        let mut big = Document::new();
        for i in 0..2_000 {
            big.append(format!("key_{i}").as_str(), "x".repeat(64));
        }
        let text = YamlDocumentStorage.serialize_to_string(&big).unwrap();
        assert!(text.len() > RETAINED_CAPACITY);
        assert_eq!(YamlDocumentStorage.read_str(&text).unwrap(), big);

        ENGINE.with(|cell| {
            let engine = cell.borrow();
            assert!(engine.buffer.is_empty());
            assert!(engine.buffer.capacity() <= RETAINED_CAPACITY);
        });
    }

    #[test]
    fn engine_is_per_thread() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let original = doc(json!({"worker": i, "items": [i, i + 1]}));
                    let text = YamlDocumentStorage.serialize_to_string(&original).unwrap();
                    YamlDocumentStorage.read_str(&text).unwrap() == original
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
