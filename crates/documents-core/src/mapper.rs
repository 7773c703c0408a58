//! Structural mapping between the tree model and typed records.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Converts typed values to tree nodes and back.
///
/// Documents use [`DefaultMapper`] unless a caller injects another mapper
/// through one of the `*_with` methods.
pub trait Mapper {
    /// Maps a typed value into a tree node.
    fn to_tree<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value>;

    /// Maps a tree node into a typed value.
    fn from_tree<T: DeserializeOwned>(&self, node: Value) -> Result<T>;
}

/// Field-name mapping driven by the types' `serde` implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultMapper;

impl Mapper for DefaultMapper {
    fn to_tree<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value> {
        Ok(serde_json::to_value(value)?)
    }

    fn from_tree<T: DeserializeOwned>(&self, node: Value) -> Result<T> {
        Ok(serde_json::from_value(node)?)
    }
}

impl<M: Mapper> Mapper for &M {
    fn to_tree<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value> {
        (**self).to_tree(value)
    }

    fn from_tree<T: DeserializeOwned>(&self, node: Value) -> Result<T> {
        (**self).from_tree(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    #[test]
    fn maps_by_field_name() {
        let endpoint = Endpoint {
            host: "localhost".into(),
            port: 8080,
        };
        let tree = DefaultMapper.to_tree(&endpoint).unwrap();
        assert_eq!(tree, json!({"host": "localhost", "port": 8080}));
        let back: Endpoint = DefaultMapper.from_tree(tree).unwrap();
        assert_eq!(back, endpoint);
    }

    #[test]
    fn missing_field_is_an_error() {
        let result: Result<Endpoint> = DefaultMapper.from_tree(json!({"host": "x"}));
        assert!(result.is_err());
    }
}
