//! Collection plugins.
//!
//! [`DedupCollectionPlugin`] is the reference collection-style plugin: its decoder turns an
//! array payload into a de-duplicating set of recursively decoded elements, and its encoder is
//! what the engine uses for `g:Set`. Register it under your own tag for protocol extensions that
//! carry set semantics:
//!
//! ```rust
//! use graphson_codec::plugins::DedupCollectionPlugin;
//! use graphson_codec::{Engine, EngineOptions, Value};
//! use serde_json::json;
//!
//! let engine = Engine::new(
//!     EngineOptions::new().with_decoder("custom:Labels", DedupCollectionPlugin::new("custom:Labels")),
//! );
//! let token = json!({"@type": "custom:Labels", "@value": ["person", "person", "software"]});
//! let labels = engine.decode_opaque(&token).unwrap();
//! assert_eq!(labels.as_set().map(|s| s.len()), Some(2));
//! ```

use crate::engine::Engine;
use crate::map::ValueSet;
use crate::plugin::{Encoded, TagDecoder, TagEncoder};
use crate::types::TypeDesc;
use crate::wire::{self, Token};
use crate::{Error, Result, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupCollectionPlugin {
    tag: &'static str,
}

impl DedupCollectionPlugin {
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        DedupCollectionPlugin { tag }
    }
}

impl TagDecoder for DedupCollectionPlugin {
    /// A payload that is not an array decodes to an empty set.
    fn decode_tag(&self, payload: &Token, engine: &Engine) -> Result<Value> {
        let Some(items) = payload.as_array() else {
            return Ok(Value::Set(ValueSet::new()));
        };
        items
            .iter()
            .map(|item| engine.decode(item, &TypeDesc::Object))
            .collect::<Result<ValueSet>>()
            .map(Value::Set)
    }
}

impl TagEncoder for DedupCollectionPlugin {
    fn tag(&self) -> &str {
        self.tag
    }

    fn encode_tag(&self, value: &Value, engine: &Engine) -> Result<Encoded> {
        let items: Vec<&Value> = match value {
            Value::Set(set) => set.iter().collect(),
            Value::List(list) => list.iter().collect(),
            other => return Err(mismatch(self.tag, other)),
        };
        encode_all(items, engine).map(Encoded::Payload)
    }
}

/// `g:List` encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPlugin;

impl TagEncoder for ListPlugin {
    fn tag(&self) -> &str {
        wire::LIST
    }

    fn encode_tag(&self, value: &Value, engine: &Engine) -> Result<Encoded> {
        match value {
            Value::List(items) => encode_all(items, engine).map(Encoded::Payload),
            other => Err(mismatch(wire::LIST, other)),
        }
    }
}

/// `g:Map` encoder, emitting the flattened `k, v, k, v` payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapPlugin;

impl TagEncoder for MapPlugin {
    fn tag(&self) -> &str {
        wire::MAP
    }

    fn encode_tag(&self, value: &Value, engine: &Engine) -> Result<Encoded> {
        let Value::Map(map) = value else {
            return Err(mismatch(wire::MAP, value));
        };
        let mut flattened = Vec::with_capacity(map.len() * 2);
        for (key, entry) in map {
            flattened.push(engine.encode(key)?);
            flattened.push(engine.encode(entry)?);
        }
        Ok(Encoded::Payload(Token::Array(flattened)))
    }
}

fn encode_all<'a, I>(items: I, engine: &Engine) -> Result<Token>
where
    I: IntoIterator<Item = &'a Value>,
{
    items
        .into_iter()
        .map(|item| engine.encode(item))
        .collect::<Result<Vec<_>>>()
        .map(Token::Array)
}

fn mismatch(tag: &str, value: &Value) -> Error {
    Error::unsupported_type(&format!("{} cannot encode {}", tag, value.kind()))
}
