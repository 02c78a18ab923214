//! Declared target types.
//!
//! A [`TypeDesc`] tells the engine what the caller wants a token decoded into. It is a closed
//! descriptor built once at the call boundary, either by hand or from a Rust type through
//! [`FromGraphson::declared`](crate::FromGraphson::declared):
//!
//! ```rust
//! use graphson_codec::{FromGraphson, ScalarKind, TypeDesc};
//! use indexmap::IndexMap;
//!
//! assert_eq!(
//!     <IndexMap<String, Vec<i32>>>::declared(),
//!     TypeDesc::map(TypeDesc::Scalar(ScalarKind::String), TypeDesc::list(TypeDesc::Scalar(ScalarKind::Int32))),
//! );
//! ```

use crate::value::ValueKind;
use std::fmt;

/// The scalar types a caller can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarKind {
    Bool,
    Int32,
    Int64,
    Float,
    Double,
    BigInt,
    String,
    Bytes,
    Date,
    /// The raw token, undecoded
    Json,
}

impl ScalarKind {
    /// The runtime kind a value must have to satisfy this scalar without conversion.
    #[must_use]
    pub const fn value_kind(&self) -> ValueKind {
        match self {
            ScalarKind::Bool => ValueKind::Bool,
            ScalarKind::Int32 => ValueKind::Int32,
            ScalarKind::Int64 => ValueKind::Int64,
            ScalarKind::Float => ValueKind::Float,
            ScalarKind::Double => ValueKind::Double,
            ScalarKind::BigInt => ValueKind::BigInt,
            ScalarKind::String => ValueKind::String,
            ScalarKind::Bytes => ValueKind::Bytes,
            ScalarKind::Date => ValueKind::Date,
            ScalarKind::Json => ValueKind::Json,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_kind().as_str())
    }
}

/// The single-parameter container shapes.
///
/// `Array` and `List` both decode to an ordered [`Value::List`](crate::Value::List); only `Set`
/// changes semantics by collapsing duplicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeqKind {
    Array,
    List,
    Set,
}

impl SeqKind {
    const fn as_str(&self) -> &'static str {
        match self {
            SeqKind::Array => "Array",
            SeqKind::List => "List",
            SeqKind::Set => "Set",
        }
    }
}

/// A caller-declared decode target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// Wrap the token in a [`LazyNode`](crate::LazyNode) without decoding it
    Lazy,
    /// Decode to whatever the token naturally is
    Object,
    Scalar(ScalarKind),
    /// Like the inner type, but `null` is accepted
    Optional(Box<TypeDesc>),
    Seq(SeqKind, Box<TypeDesc>),
    Map(Box<TypeDesc>, Box<TypeDesc>),
}

impl TypeDesc {
    #[must_use]
    pub fn list(elem: TypeDesc) -> Self {
        TypeDesc::Seq(SeqKind::List, Box::new(elem))
    }

    #[must_use]
    pub fn array(elem: TypeDesc) -> Self {
        TypeDesc::Seq(SeqKind::Array, Box::new(elem))
    }

    #[must_use]
    pub fn set(elem: TypeDesc) -> Self {
        TypeDesc::Seq(SeqKind::Set, Box::new(elem))
    }

    #[must_use]
    pub fn map(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Map(Box::new(key), Box::new(value))
    }

    #[must_use]
    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Optional(Box::new(inner))
    }

    /// Returns `true` if `null` satisfies this type without further dispatch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::{ScalarKind, TypeDesc};
    ///
    /// assert!(TypeDesc::Object.accepts_null());
    /// assert!(TypeDesc::optional(TypeDesc::Scalar(ScalarKind::Int32)).accepts_null());
    /// assert!(!TypeDesc::Scalar(ScalarKind::Int32).accepts_null());
    /// ```
    #[must_use]
    pub const fn accepts_null(&self) -> bool {
        matches!(self, TypeDesc::Object | TypeDesc::Optional(_))
    }

    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        matches!(self, TypeDesc::Lazy)
    }

    /// Peels any `Optional` wrappers.
    #[must_use]
    pub fn non_null(&self) -> &TypeDesc {
        match self {
            TypeDesc::Optional(inner) => inner.non_null(),
            other => other,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Lazy => write!(f, "LazyNode"),
            TypeDesc::Object => write!(f, "Object"),
            TypeDesc::Scalar(kind) => write!(f, "{}", kind),
            TypeDesc::Optional(inner) => write!(f, "Option<{}>", inner),
            TypeDesc::Seq(kind, elem) => write!(f, "{}<{}>", kind.as_str(), elem),
            TypeDesc::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
        }
    }
}
