//! Configuration options for building an [`Engine`](crate::Engine).
//!
//! [`EngineOptions`] collects everything that becomes immutable once the engine exists:
//!
//! - decoder overrides, keyed by tag
//! - encoder overrides, keyed by runtime [`ValueKind`]
//! - the scalar [`ConverterRegistry`]
//! - whether the built-in plugins are installed underneath the overrides
//!
//! ## Examples
//!
//! ```rust
//! use graphson_codec::plugins::ByteBufferPlugin;
//! use graphson_codec::{ConverterRegistry, Engine, EngineOptions, ValueKind};
//!
//! // Defaults: built-in plugins and the standard converter catalog
//! let engine = Engine::new(EngineOptions::new());
//!
//! // Nothing but exact matches and the byte buffer plugin
//! let options = EngineOptions::bare()
//!     .with_decoder("gx:ByteBuffer", ByteBufferPlugin)
//!     .with_encoder(ValueKind::Bytes, ByteBufferPlugin)
//!     .with_converters(ConverterRegistry::empty());
//! let engine = Engine::new(options);
//! ```

use crate::convert::ConverterRegistry;
use crate::plugin::{TagDecoder, TagEncoder};
use crate::value::ValueKind;
use std::fmt;
use std::sync::Arc;

/// Construction-time configuration for an [`Engine`](crate::Engine).
#[derive(Clone)]
pub struct EngineOptions {
    pub builtins: bool,
    pub converters: ConverterRegistry,
    pub(crate) decoders: Vec<(String, Arc<dyn TagDecoder>)>,
    pub(crate) encoders: Vec<(ValueKind, Arc<dyn TagEncoder>)>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            builtins: true,
            converters: ConverterRegistry::standard(),
            decoders: Vec::new(),
            encoders: Vec::new(),
        }
    }
}

impl EngineOptions {
    /// Creates default options (built-in plugins, standard converters, no overrides).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::EngineOptions;
    ///
    /// let options = EngineOptions::new();
    /// assert!(options.builtins);
    /// assert!(!options.converters.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options with no built-in plugins and no converters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::EngineOptions;
    ///
    /// let options = EngineOptions::bare();
    /// assert!(!options.builtins);
    /// assert!(options.converters.is_empty());
    /// ```
    #[must_use]
    pub fn bare() -> Self {
        EngineOptions {
            builtins: false,
            converters: ConverterRegistry::empty(),
            ..Default::default()
        }
    }

    /// Registers a decoder for `tag`. A later registration for the same tag, or a built-in
    /// under that tag, is replaced.
    #[must_use]
    pub fn with_decoder<D>(mut self, tag: impl Into<String>, decoder: D) -> Self
    where
        D: TagDecoder + 'static,
    {
        self.decoders.push((tag.into(), Arc::new(decoder)));
        self
    }

    /// Registers an encoder for values of `kind`.
    #[must_use]
    pub fn with_encoder<E>(mut self, kind: ValueKind, encoder: E) -> Self
    where
        E: TagEncoder + 'static,
    {
        self.encoders.push((kind, Arc::new(encoder)));
        self
    }

    #[must_use]
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    /// Enables or disables the built-in plugins.
    #[must_use]
    pub fn with_builtins(mut self, builtins: bool) -> Self {
        self.builtins = builtins;
        self
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("builtins", &self.builtins)
            .field("converters", &self.converters)
            .field(
                "decoders",
                &self.decoders.iter().map(|(tag, _)| tag).collect::<Vec<_>>(),
            )
            .field(
                "encoders",
                &self.encoders.iter().map(|(kind, _)| kind).collect::<Vec<_>>(),
            )
            .finish()
    }
}
