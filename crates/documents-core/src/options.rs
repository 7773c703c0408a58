//! JSON output options.
//!
//! [`JsonOptions`] is a plain value handed to the `*_with` serializers. A
//! process-wide default backs the convenience methods
//! ([`Document::to_json`](crate::Document::to_json) and friends); it can be
//! replaced once, before anything reads it.

use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::io;

static GLOBAL: OnceCell<JsonOptions> = OnceCell::new();

/// How trees are rendered as JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOptions {
    /// Spaces per nesting level in pretty output.
    pub indent: usize,
    /// Keep object members whose value is `null`.
    pub serialize_nulls: bool,
    /// Escape `<`, `>`, `&`, `=` and `'` as `\uXXXX`.
    pub escape_html: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            serialize_nulls: true,
            escape_html: false,
        }
    }
}

impl JsonOptions {
    /// The process-wide options, initialized to [`JsonOptions::default`] on
    /// first use.
    pub fn global() -> &'static JsonOptions {
        GLOBAL.get_or_init(JsonOptions::default)
    }

    /// Installs the process-wide options.
    ///
    /// Fails, handing the options back, once the global has been read or
    /// installed.
    pub fn install_global(options: JsonOptions) -> Result<(), JsonOptions> {
        GLOBAL.set(options)
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_serialize_nulls(mut self, serialize_nulls: bool) -> Self {
        self.serialize_nulls = serialize_nulls;
        self
    }

    pub fn with_escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }

    /// Writes `value` without whitespace.
    pub fn write_compact<T, W>(&self, value: &T, writer: W) -> serde_json::Result<()>
    where
        T: Serialize + ?Sized,
        W: io::Write,
    {
        if self.escape_html {
            self.emit(value, writer, HtmlSafe(CompactFormatter))
        } else {
            self.emit(value, writer, CompactFormatter)
        }
    }

    /// Writes `value` indented by [`JsonOptions::indent`] spaces per level.
    pub fn write_pretty<T, W>(&self, value: &T, writer: W) -> serde_json::Result<()>
    where
        T: Serialize + ?Sized,
        W: io::Write,
    {
        let indent = vec![b' '; self.indent];
        let pretty = PrettyFormatter::with_indent(&indent);
        if self.escape_html {
            self.emit(value, writer, HtmlSafe(pretty))
        } else {
            self.emit(value, writer, pretty)
        }
    }

    /// Renders `tree` without whitespace.
    pub fn to_string<T: JsonTree + ?Sized>(&self, tree: &T) -> String {
        let mut buf = Vec::with_capacity(128);
        match self.write_compact(tree, &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            // Trees have string keys only, and writing into a Vec cannot fail.
            Err(_) => String::new(),
        }
    }

    /// Renders `tree` indented.
    pub fn to_string_pretty<T: JsonTree + ?Sized>(&self, tree: &T) -> String {
        let mut buf = Vec::with_capacity(256);
        match self.write_pretty(tree, &mut buf) {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => String::new(),
        }
    }

    /// Serializes `value` in place. Only dropping null members needs an
    /// intermediate tree.
    fn emit<T, W, F>(&self, value: &T, writer: W, formatter: F) -> serde_json::Result<()>
    where
        T: Serialize + ?Sized,
        W: io::Write,
        F: Formatter,
    {
        let mut serializer = Serializer::with_formatter(writer, formatter);
        if self.serialize_nulls {
            value.serialize(&mut serializer)
        } else {
            without_null_members(&serde_json::to_value(value)?).serialize(&mut serializer)
        }
    }
}

/// JSON trees: values whose serialization cannot fail.
pub trait JsonTree: Serialize {}

impl JsonTree for Value {}

impl JsonTree for Map<String, Value> {}

/// Drops `null` object members at every depth. Array slots are kept so
/// element positions do not shift.
fn without_null_members(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, val) in map {
                if !val.is_null() {
                    out.insert(key.clone(), without_null_members(val));
                }
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(without_null_members).collect()),
        other => other.clone(),
    }
}

/// Formatter adapter that escapes HTML-sensitive characters inside strings.
struct HtmlSafe<F>(F);

impl<F: Formatter> Formatter for HtmlSafe<F> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if matches!(c, '<' | '>' | '&' | '=' | '\'') {
                writer.write_all(fragment[start..i].as_bytes())?;
                write!(writer, "\\u{:04x}", c as u32)?;
                start = i + c.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_has_no_whitespace() {
        let value = json!({"a": [1, 2], "b": null});
        assert_eq!(JsonOptions::default().to_string(&value), r#"{"a":[1,2],"b":null}"#);
    }

    #[test]
    fn pretty_indents_and_keeps_nulls() {
        let value = json!({"a": 1, "b": null});
        assert_eq!(
            JsonOptions::default().to_string_pretty(&value),
            "{\n  \"a\": 1,\n  \"b\": null\n}"
        );
    }

    #[test]
    fn custom_indent() {
        let value = json!({"a": 1});
        let options = JsonOptions::default().with_indent(4);
        assert_eq!(options.to_string_pretty(&value), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn html_left_alone_by_default() {
        let value = json!({"html": "<b>&'='</b>"});
        assert_eq!(JsonOptions::default().to_string(&value), r#"{"html":"<b>&'='</b>"}"#);
    }

    #[test]
    fn html_escaping() {
        let value = json!({"html": "a<b>c&d='e'"});
        let options = JsonOptions::default().with_escape_html(true);
        assert_eq!(
            options.to_string(&value),
            r#"{"html":"a\u003cb\u003ec\u0026d\u003d\u0027e\u0027"}"#
        );
    }

    #[test]
    fn html_escaping_in_keys_and_pretty_output() {
        let value = json!({"<k>": "v"});
        let options = JsonOptions::default().with_escape_html(true);
        assert_eq!(options.to_string_pretty(&value), "{\n  \"\\u003ck\\u003e\": \"v\"\n}");
    }

    #[test]
    fn writes_any_serializable_value() {
        #[derive(Serialize)]
        struct Endpoint<'a> {
            host: &'a str,
            port: Option<u16>,
        }

        let endpoint = Endpoint { host: "a", port: None };
        let mut buf = Vec::new();
        JsonOptions::default().write_compact(&endpoint, &mut buf).unwrap();
        assert_eq!(buf, br#"{"host":"a","port":null}"#);

        buf.clear();
        JsonOptions::default()
            .with_serialize_nulls(false)
            .write_compact(&endpoint, &mut buf)
            .unwrap();
        assert_eq!(buf, br#"{"host":"a"}"#);
    }

    #[test]
    fn maps_render_like_values() {
        let value = json!({"a": 1, "b": null});
        let map = value.as_object().unwrap();
        let options = JsonOptions::default();
        assert_eq!(options.to_string(map), options.to_string(&value));
        assert_eq!(options.to_string_pretty(map), options.to_string_pretty(&value));
    }

    #[test]
    fn dropping_nulls_keeps_array_slots() {
        let value = json!({"a": null, "b": {"c": null, "d": 1}, "e": [null, 2]});
        let options = JsonOptions::default().with_serialize_nulls(false);
        assert_eq!(options.to_string(&value), r#"{"b":{"d":1},"e":[null,2]}"#);
    }

    #[test]
    fn global_defaults() {
        assert_eq!(JsonOptions::global().indent, 2);
        assert!(JsonOptions::install_global(JsonOptions::default()).is_err());
    }
}
