//! The dispatch engine handle.
//!
//! An [`Engine`] owns the two immutable registries that drive every decode and encode: the
//! [`PluginRegistry`] and the [`ConverterRegistry`]. Both are frozen at construction and shared
//! behind an `Arc`, so cloning an engine is cheap and clones can be handed to other threads or
//! captured by [`LazyNode`](crate::LazyNode)s.
//!
//! The decode path lives in [`de`](crate::de) and the encode path in [`ser`](crate::ser); this
//! module holds construction and the typed and text-level conveniences built on top of them.
//!
//! ## Examples
//!
//! ```rust
//! use graphson_codec::Engine;
//! use std::collections::HashSet;
//!
//! let engine = Engine::default();
//! let names: HashSet<String> =
//!     engine.from_str(r#"{"@type": "g:Set", "@value": ["marko", "vadas", "marko"]}"#).unwrap();
//! assert_eq!(names.len(), 2);
//! ```

use crate::convert::ConverterRegistry;
use crate::options::EngineOptions;
use crate::plugin::{PluginRegistry, TagDecoder, TagEncoder};
use crate::typed::FromGraphson;
use crate::types::TypeDesc;
use crate::value::{Value, ValueKind};
use crate::wire::Token;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;
use tracing::debug;

struct Registries {
    plugins: PluginRegistry,
    converters: ConverterRegistry,
}

/// A cheap, cloneable handle to an immutable set of registries.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Registries>,
}

impl Engine {
    /// Builds an engine from `options`.
    ///
    /// Built-in plugins (if enabled) are installed first and caller overrides are applied on
    /// top, so an override registered under a built-in tag or kind replaces it.
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        let EngineOptions {
            builtins,
            converters,
            decoders,
            encoders,
        } = options;
        let plugins = PluginRegistry::build(builtins, decoders, encoders);
        debug!(?plugins, converters = converters.len(), "engine constructed");
        Engine {
            inner: Arc::new(Registries {
                plugins,
                converters,
            }),
        }
    }

    /// Builds a default engine with the given override maps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::plugins::DedupCollectionPlugin;
    /// use graphson_codec::{Engine, TagDecoder};
    /// use std::collections::HashMap;
    /// use std::sync::Arc;
    ///
    /// let mut decoders: HashMap<String, Arc<dyn TagDecoder>> = HashMap::new();
    /// decoders.insert("custom:Tags".into(), Arc::new(DedupCollectionPlugin::new("custom:Tags")));
    ///
    /// let engine = Engine::with_overrides(decoders, HashMap::new());
    /// assert!(engine.plugins().decoder("custom:Tags").is_some());
    /// ```
    #[must_use]
    pub fn with_overrides(
        decoders: HashMap<String, Arc<dyn TagDecoder>>,
        encoders: HashMap<ValueKind, Arc<dyn TagEncoder>>,
    ) -> Self {
        let mut options = EngineOptions::new();
        options.decoders.extend(decoders);
        options.encoders.extend(encoders);
        Self::new(options)
    }

    #[must_use]
    pub fn plugins(&self) -> &PluginRegistry {
        &self.inner.plugins
    }

    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.inner.converters
    }

    /// Decodes `token` with no declared type beyond `Object`.
    ///
    /// # Errors
    ///
    /// See [`Engine::decode`].
    pub fn decode_opaque(&self, token: &Token) -> Result<Value> {
        self.decode(token, &TypeDesc::Object)
    }

    /// Decodes `token` into a Rust type, declaring [`FromGraphson::declared`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::Engine;
    /// use indexmap::IndexMap;
    /// use serde_json::json;
    ///
    /// let engine = Engine::default();
    /// let token = json!({"@type": "g:Map", "@value": ["marko", 29, "vadas", 27]});
    /// let ages: IndexMap<String, i32> = engine.decode_as(&token).unwrap();
    /// assert_eq!(ages["vadas"], 27);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Engine::decode`].
    pub fn decode_as<T: FromGraphson>(&self, token: &Token) -> Result<T> {
        let value = self.decode(token, &T::declared())?;
        T::from_value(value)
    }

    /// Parses JSON text and decodes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for invalid JSON, otherwise see [`Engine::decode`].
    pub fn from_str<T: FromGraphson>(&self, s: &str) -> Result<T> {
        let token: Token = serde_json::from_str(s)?;
        self.decode_as(&token)
    }

    /// Parses JSON bytes and decodes them into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for invalid JSON, otherwise see [`Engine::decode`].
    pub fn from_slice<T: FromGraphson>(&self, v: &[u8]) -> Result<T> {
        let token: Token = serde_json::from_slice(v)?;
        self.decode_as(&token)
    }

    /// Reads JSON from `reader` and decodes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails, otherwise see [`Engine::from_str`].
    pub fn from_reader<R, T>(&self, reader: R) -> Result<T>
    where
        R: io::Read,
        T: FromGraphson,
    {
        let token: Token = serde_json::from_reader(reader)?;
        self.decode_as(&token)
    }

    /// Encodes `value` and renders it as compact JSON text.
    ///
    /// # Errors
    ///
    /// See [`Engine::encode`].
    pub fn to_string(&self, value: &Value) -> Result<String> {
        let token = self.encode(value)?;
        serde_json::to_string(&token).map_err(Error::from)
    }

    /// Encodes `value` and writes it as compact JSON to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails, otherwise see [`Engine::encode`].
    pub fn to_writer<W: io::Write>(&self, writer: W, value: &Value) -> Result<()> {
        let token = self.encode(value)?;
        serde_json::to_writer(writer, &token).map_err(Error::from)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineOptions::default())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("plugins", self.plugins())
            .field("converters", self.converters())
            .finish()
    }
}
