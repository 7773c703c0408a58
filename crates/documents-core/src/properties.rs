//! Flat string tables imported into and exported from documents.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::options::JsonOptions;

/// An ordered `key -> value` table of strings.
pub type Properties = IndexMap<String, String>;

/// Renders a node as a property value: strings verbatim, anything else as
/// compact JSON.
pub fn property_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => JsonOptions::global().to_string(other),
    }
}

/// Exports every top-level member of `map` as one property.
pub fn to_properties(map: &Map<String, Value>) -> Properties {
    map.iter()
        .map(|(key, value)| (key.clone(), property_value(value)))
        .collect()
}
