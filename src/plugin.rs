//! The tag plugin contract and the registry that holds plugins.
//!
//! A plugin owns one tag string and provides two independent, stateless operations:
//!
//! - [`TagDecoder::decode_tag`]: `@value` payload → host [`Value`], free to recurse into the
//!   engine for nested tokens with whatever declared type it chooses
//! - [`TagEncoder::encode_tag`]: host value → payload (the engine wraps it with
//!   [`TagEncoder::tag`]) or a fully formed token
//!
//! Decoders are registered by tag and encoders by [`ValueKind`]. The registry is built once when
//! an [`Engine`] is constructed and never changes afterwards. Caller registrations replace
//! built-ins that share the same key.
//!
//! ## Examples
//!
//! Any `Fn(&Token, &Engine) -> Result<Value>` is a decoder:
//!
//! ```rust
//! use graphson_codec::{Engine, EngineOptions, Value};
//! use serde_json::json;
//!
//! let engine = Engine::new(EngineOptions::new().with_decoder(
//!     "demo:Upper",
//!     |payload: &serde_json::Value, _: &Engine| -> graphson_codec::Result<Value> {
//!         Ok(Value::from(payload.as_str().unwrap_or_default().to_uppercase()))
//!     },
//! ));
//!
//! let token = json!({"@type": "demo:Upper", "@value": "marko"});
//! assert_eq!(engine.decode_opaque(&token).unwrap(), Value::from("MARKO"));
//! ```

use crate::engine::Engine;
use crate::value::ValueKind;
use crate::wire::Token;
use crate::{Result, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Decodes the payload of one tag.
pub trait TagDecoder: Send + Sync {
    fn decode_tag(&self, payload: &Token, engine: &Engine) -> Result<Value>;
}

impl<F> TagDecoder for F
where
    F: Fn(&Token, &Engine) -> Result<Value> + Send + Sync,
{
    fn decode_tag(&self, payload: &Token, engine: &Engine) -> Result<Value> {
        self(payload, engine)
    }
}

/// What an encoder produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    /// A bare payload; the engine wraps it as `{"@type": tag, "@value": payload}`
    Payload(Token),
    /// A complete token, emitted as is
    Token(Token),
}

/// Encodes host values of one runtime kind.
pub trait TagEncoder: Send + Sync {
    /// The tag wrapped around [`Encoded::Payload`] results.
    fn tag(&self) -> &str;

    fn encode_tag(&self, value: &Value, engine: &Engine) -> Result<Encoded>;
}

/// Immutable tag → decoder and kind → encoder tables.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    decoders: HashMap<String, Arc<dyn TagDecoder>>,
    encoders: HashMap<ValueKind, Arc<dyn TagEncoder>>,
}

impl PluginRegistry {
    pub(crate) fn build(
        builtins: bool,
        decoders: Vec<(String, Arc<dyn TagDecoder>)>,
        encoders: Vec<(ValueKind, Arc<dyn TagEncoder>)>,
    ) -> Self {
        let mut registry = if builtins {
            PluginRegistry {
                decoders: crate::plugins::builtin_decoders()
                    .into_iter()
                    .map(|(tag, decoder)| (tag.to_string(), decoder))
                    .collect(),
                encoders: crate::plugins::builtin_encoders().into_iter().collect(),
            }
        } else {
            PluginRegistry::default()
        };

        for (tag, decoder) in decoders {
            if registry.decoders.insert(tag.clone(), decoder).is_some() {
                debug!(%tag, "decoder override replaces previous registration");
            }
        }
        for (kind, encoder) in encoders {
            if registry.encoders.insert(kind, encoder).is_some() {
                debug!(%kind, "encoder override replaces previous registration");
            }
        }
        registry
    }

    #[must_use]
    pub fn decoder(&self, tag: &str) -> Option<&dyn TagDecoder> {
        self.decoders.get(tag).map(|d| d.as_ref())
    }

    #[must_use]
    pub fn encoder(&self, kind: ValueKind) -> Option<&dyn TagEncoder> {
        self.encoders.get(&kind).map(|e| e.as_ref())
    }

    /// Registered decoder tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.decoders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut encoders: Vec<_> = self
            .encoders
            .iter()
            .map(|(kind, encoder)| (*kind, encoder.tag().to_string()))
            .collect();
        encoders.sort();
        f.debug_struct("PluginRegistry")
            .field("decoders", &self.tags())
            .field("encoders", &encoders)
            .finish()
    }
}
