//! documents-core - a mutable key-value document over a JSON tree.
//!
//! The tree model is [`serde_json::Value`] with insertion order preserved.
//! [`Document`] wraps one object node and layers typed getters, default-value
//! fallbacks and structural mapping (via `serde`) on top of it.
//!
//! # Example
//!
//! ```
//! use documents_core::Document;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Limits {
//!     max_connections: u32,
//! }
//!
//! let mut doc = Document::new();
//! doc.append_serialized("limits", &Limits { max_connections: 64 }).unwrap();
//! doc.append_binary("token", &[0xde, 0xad]);
//!
//! let limits: Limits = doc.get_as("limits").unwrap().unwrap();
//! assert_eq!(limits.max_connections, 64);
//! assert_eq!(doc.get_binary("token").unwrap(), vec![0xde, 0xad]);
//! assert_eq!(doc.to_json(), r#"{"limits":{"max_connections":64},"token":"3q0="}"#);
//! ```

pub mod coerce;
pub mod document;
pub mod error;
pub mod mapper;
pub mod options;
pub mod properties;

pub use document::Document;
pub use error::{DocumentError, Result};
pub use mapper::{DefaultMapper, Mapper};
pub use options::{JsonOptions, JsonTree};
pub use properties::Properties;
