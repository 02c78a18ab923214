//! # graphson_codec
//!
//! A typed-tag value codec for GraphSON-style wire data.
//!
//! ## What is a typed-tag codec?
//!
//! Graph databases return query results as JSON in which every non-primitive value carries its
//! logical type alongside its payload:
//!
//! ```text
//! {"@type": "g:Map", "@value": ["marko", {"@type": "g:Int32", "@value": 29}]}
//! ```
//!
//! The wire format does not know what the caller wants. The caller does: the same token may be
//! wanted as an `IndexMap<String, i64>`, as an opaque [`Value`], or not decoded at all until
//! later. This crate resolves that at decode time by dispatching on the token's tag **and** a
//! caller-declared [`TypeDesc`].
//!
//! ## Key Features
//!
//! - **Declared-type dispatch**: lazy passthrough, built-in list/set/map/bulk-set codecs,
//!   per-tag plugins, and a scalar converter bridge, tried in a fixed precedence
//! - **Pluggable**: decoders keyed by tag and encoders keyed by runtime kind, replaceable per
//!   engine
//! - **Lazy nodes**: defer decoding of any subtree until its type is known
//! - **Typed API**: `engine.decode_as::<HashSet<String>>(&token)` through [`FromGraphson`]
//! - **Immutable and shareable**: an [`Engine`] is a cheap `Clone + Send + Sync` handle
//!
//! ## Quick Start
//!
//! ```rust
//! use graphson_codec::{Engine, Value};
//! use indexmap::IndexMap;
//!
//! let engine = Engine::default();
//!
//! let text = r#"{"@type": "g:Map", "@value": ["marko", 29, "vadas", 27]}"#;
//! let ages: IndexMap<String, i32> = engine.from_str(text).unwrap();
//! assert_eq!(ages["marko"], 29);
//!
//! let token = engine.encode(&Value::from(vec!["a", "b"])).unwrap();
//! assert_eq!(token["@type"], "g:List");
//! ```
//!
//! ### Deferred decoding
//!
//! ```rust
//! use graphson_codec::{Engine, LazyNode, TypeDesc};
//! use serde_json::json;
//!
//! let engine = Engine::default();
//! let token = json!({"@type": "g:BulkSet", "@value": ["x", 2, "y", 1]});
//!
//! let node: LazyNode = engine.decode_as(&token).unwrap();
//! let expanded: Vec<String> = node.materialize_as().unwrap();
//! assert_eq!(expanded, vec!["x", "x", "y"]);
//! ```
//!
//! ### Custom tags
//!
//! ```rust
//! use graphson_codec::plugins::DedupCollectionPlugin;
//! use graphson_codec::{tagged, Engine, EngineOptions};
//! use std::collections::BTreeSet;
//!
//! let engine = Engine::new(
//!     EngineOptions::new().with_decoder("custom:Labels", DedupCollectionPlugin::new("custom:Labels")),
//! );
//! let labels: BTreeSet<String> = engine
//!     .decode_as(&tagged!("custom:Labels" => ["person", "person", "software"]))
//!     .unwrap();
//! assert_eq!(labels.len(), 2);
//! ```
//!
//! ## Logging
//!
//! Dispatch decisions are reported through [`tracing`] at `trace` level and registry overrides
//! at `debug` level. The library never installs a subscriber.
//!
//! ## Wire Format
//!
//! See the [`wire`] module for the tags and payload shapes this crate understands.

pub mod convert;
pub mod de;
pub mod engine;
pub mod error;
pub mod macros;
pub mod map;
pub mod node;
pub mod options;
pub mod plugin;
pub mod plugins;
pub mod ser;
pub mod typed;
pub mod types;
pub mod value;
pub mod wire;

pub use convert::{Bridged, Converter, ConverterRegistry, ConverterRegistryBuilder};
pub use engine::Engine;
pub use error::{Error, Result};
pub use map::{ValueMap, ValueSet};
pub use node::LazyNode;
pub use options::EngineOptions;
pub use plugin::{Encoded, PluginRegistry, TagDecoder, TagEncoder};
pub use ser::{to_set, to_value, ValueSerializer};
pub use typed::{Bytes, FromGraphson};
pub use types::{ScalarKind, SeqKind, TypeDesc};
pub use value::{Number, Value, ValueKind};
pub use wire::Token;

#[doc(hidden)]
pub use serde_json as __serde_json;

use std::io;

/// Decodes JSON text into `T` with a default engine.
///
/// Each call builds a fresh [`Engine`]; hold on to one with [`Engine::from_str`] when decoding
/// repeatedly or when custom plugins are needed.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::from_str;
///
/// let numbers: Vec<i64> = from_str(r#"{"@type": "g:List", "@value": [1, 2, 3]}"#).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Json`] for invalid JSON text, or any decode error.
pub fn from_str<T: FromGraphson>(s: &str) -> Result<T> {
    Engine::default().from_str(s)
}

/// Decodes JSON bytes into `T` with a default engine.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::from_slice;
///
/// let flag: bool = from_slice(b"true").unwrap();
/// assert!(flag);
/// ```
///
/// # Errors
///
/// Returns [`Error::Json`] for invalid JSON, or any decode error.
pub fn from_slice<T: FromGraphson>(v: &[u8]) -> Result<T> {
    Engine::default().from_slice(v)
}

/// Reads JSON from `reader` and decodes it into `T` with a default engine.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::from_reader;
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(br#"{"@type": "g:Int64", "@value": 7}"#);
/// let n: i64 = from_reader(cursor).unwrap();
/// assert_eq!(n, 7);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, [`Error::Json`] for invalid JSON, or any decode error.
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: FromGraphson,
{
    Engine::default().from_reader(reader)
}

/// Encodes `value` as compact JSON text with a default engine.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::{to_string, Value};
///
/// let text = to_string(&Value::from(7i32)).unwrap();
/// assert_eq!(text, r#"{"@type":"g:Int32","@value":7}"#);
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for values with no encoder and no untagged form.
pub fn to_string(value: &Value) -> Result<String> {
    Engine::default().to_string(value)
}

/// Encodes `value` as compact JSON into `writer` with a default engine.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails, or any encode error.
pub fn to_writer<W: io::Write>(writer: W, value: &Value) -> Result<()> {
    Engine::default().to_writer(writer, value)
}
