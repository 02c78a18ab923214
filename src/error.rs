//! Error types for GraphSON decoding and encoding.
//!
//! Every failure in this crate is fatal to the call that produced it: the engine performs no
//! recovery or retry, and it is up to the caller to log, skip, or abort.
//!
//! ## Error Categories
//!
//! - **Malformed input**: structurally invalid tagged objects, bad BulkSet counts, bad base64
//! - **Unsupported target**: a composite tag decoded against a declared type with no compatible shape
//! - **Duplicate key**: a `g:Map` payload repeats a key
//! - **Conversion**: the scalar bridge found neither a converter nor a lossless cast
//! - **Null target**: `null` decoded against a non-nullable declared type
//! - **Unsupported type**: encode found no encoder and the value has no untagged form
//!
//! ## Examples
//!
//! ```rust
//! use graphson_codec::{Engine, Error, TypeDesc};
//! use serde_json::json;
//!
//! let engine = Engine::default();
//! let token = json!({"@type": "g:Map", "@value": ["a", 1, "a", 2]});
//!
//! match engine.decode(&token, &TypeDesc::Object) {
//!     Err(Error::DuplicateKey(key)) => assert_eq!(key, "a"),
//!     other => panic!("expected duplicate key, got {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while decoding or encoding GraphSON tokens.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The token tree is structurally invalid for the tag being decoded
    #[error("Malformed wire input: {0}")]
    MalformedInput(String),

    /// A composite tag cannot be expressed as the declared target type
    #[error("Cannot decode {tag} into declared type {target}")]
    UnsupportedTarget { tag: String, target: String },

    /// A map payload carried the same key twice
    #[error("Duplicate map key: {0}")]
    DuplicateKey(String),

    /// No converter and no representational cast satisfied the declared type
    #[error("Cannot convert {source_type} to {target_type}")]
    Conversion {
        source_type: String,
        target_type: String,
    },

    /// `null` was decoded against a declared type that does not accept it
    #[error("Cannot decode null into non-nullable {0}")]
    NullTarget(String),

    /// Encoding found no encoder and the value has no untagged representation
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// JSON text could not be parsed into a token tree
    #[error("JSON error: {0}")]
    Json(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error, mostly raised by third-party plugins
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a malformed-input error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::Error;
    ///
    /// let err = Error::malformed("g:Map payload must have even length");
    /// assert!(err.to_string().contains("even length"));
    /// ```
    pub fn malformed<T: fmt::Display>(msg: T) -> Self {
        Error::MalformedInput(msg.to_string())
    }

    /// Creates an unsupported-target error for a tag that cannot become `target`.
    pub fn unsupported_target(tag: &str, target: impl fmt::Display) -> Self {
        Error::UnsupportedTarget {
            tag: tag.to_string(),
            target: target.to_string(),
        }
    }

    pub fn duplicate_key(key: impl fmt::Display) -> Self {
        Error::DuplicateKey(key.to_string())
    }

    /// Creates a conversion error naming both the source and the declared type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::Error;
    ///
    /// let err = Error::conversion("String", "Int32");
    /// assert_eq!(err.to_string(), "Cannot convert String to Int32");
    /// ```
    pub fn conversion(source: impl fmt::Display, target: impl fmt::Display) -> Self {
        Error::Conversion {
            source_type: source.to_string(),
            target_type: target.to_string(),
        }
    }

    pub fn null_target(target: impl fmt::Display) -> Self {
        Error::NullTarget(target.to_string())
    }

    /// Creates an unsupported type error for values that cannot be encoded.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::Error;
    ///
    /// let err = Error::custom("vertex label missing");
    /// assert!(err.to_string().contains("vertex label missing"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::io(&err.to_string())
        } else {
            Error::Json(err.to_string())
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
