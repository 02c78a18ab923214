//! Mapping Rust types onto declared types.
//!
//! [`FromGraphson`] is how typed callers talk to the engine: the type describes itself once as a
//! [`TypeDesc`], the engine decodes against that descriptor, and [`FromGraphson::from_value`]
//! unpacks the result. Because the engine already guarantees the value satisfies the
//! descriptor, `from_value` only fails when a custom implementation declares one shape and
//! expects another.
//!
//! | Rust type | Declared type |
//! |-----------|---------------|
//! | `bool`, `i32`, `i64`, `f32`, `f64`, `String` | the matching scalar |
//! | `BigInt`, `DateTime<Utc>` | `BigInt`, `Date` |
//! | `serde_json::Value` | `Json` (the raw token) |
//! | [`Bytes`] | `Bytes` |
//! | [`Value`] | `Object` |
//! | [`LazyNode`] | `Lazy` |
//! | `Option<T>` | `Optional(T)` |
//! | `Vec<T>` | `List(T)` |
//! | `HashSet<T>`, `BTreeSet<T>`, `IndexSet<T>` | `Set(T)` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>`, `IndexMap<K, V>` | `Map(K, V)` |

use crate::node::LazyNode;
use crate::types::{ScalarKind, TypeDesc};
use crate::value::{Number, Value};
use crate::wire::Token;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use num_bigint::BigInt;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

/// A Rust type the engine can decode into.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::{Engine, Error, FromGraphson, Result, TypeDesc, Value};
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq)]
/// struct Label(String);
///
/// impl FromGraphson for Label {
///     fn declared() -> TypeDesc {
///         String::declared()
///     }
///
///     fn from_value(value: Value) -> Result<Self> {
///         String::from_value(value).map(Label)
///     }
/// }
///
/// let label: Label = Engine::default().decode_as(&json!("person")).unwrap();
/// assert_eq!(label, Label("person".into()));
/// ```
pub trait FromGraphson: Sized {
    /// The declared type handed to the engine.
    fn declared() -> TypeDesc;

    /// Unpacks a value that satisfies [`FromGraphson::declared`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] when `value` does not have the declared shape.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T: FromGraphson>(value: &Value) -> Error {
    Error::conversion(value.kind(), T::declared())
}

macro_rules! impl_scalar {
    ($ty:ty, $kind:ident, $pattern:pat => $out:expr) => {
        impl FromGraphson for $ty {
            fn declared() -> TypeDesc {
                TypeDesc::Scalar(ScalarKind::$kind)
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    $pattern => Ok($out),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

impl_scalar!(bool, Bool, Value::Bool(b) => b);
impl_scalar!(i32, Int32, Value::Number(Number::Int32(i)) => i);
impl_scalar!(i64, Int64, Value::Number(Number::Int64(i)) => i);
impl_scalar!(f32, Float, Value::Number(Number::Float(f)) => f);
impl_scalar!(f64, Double, Value::Number(Number::Double(d)) => d);
impl_scalar!(String, String, Value::String(s) => s);
impl_scalar!(BigInt, BigInt, Value::BigInt(bi) => bi);
impl_scalar!(DateTime<Utc>, Date, Value::Date(dt) => dt);
impl_scalar!(Token, Json, Value::Json(token) => token);
impl_scalar!(Bytes, Bytes, Value::Bytes(bytes) => Bytes(bytes));

/// A byte buffer, the typed target for `gx:ByteBuffer`.
///
/// `Vec<u8>` already means a list of numbers, so binary payloads get their own type.
///
/// ```rust
/// use graphson_codec::{Bytes, Engine};
/// use serde_json::json;
///
/// let token = json!({"@type": "gx:ByteBuffer", "@value": "AAEC"});
/// let bytes: Bytes = Engine::default().decode_as(&token).unwrap();
/// assert_eq!(bytes.as_ref(), &[0u8, 1, 2][..]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes.0)
    }
}

impl FromGraphson for Value {
    fn declared() -> TypeDesc {
        TypeDesc::Object
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromGraphson for LazyNode {
    fn declared() -> TypeDesc {
        TypeDesc::Lazy
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Node(node) => Ok(node),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: FromGraphson> FromGraphson for Option<T> {
    fn declared() -> TypeDesc {
        TypeDesc::optional(T::declared())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Elements of a decoded list or set, in order.
fn elements<C: FromGraphson>(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        Value::Set(set) => Ok(set.into_iter().collect()),
        other => Err(mismatch::<C>(&other)),
    }
}

fn entries<C: FromGraphson>(value: Value) -> Result<Vec<(Value, Value)>> {
    match value {
        Value::Map(map) => Ok(map.into_iter().collect()),
        other => Err(mismatch::<C>(&other)),
    }
}

impl<T: FromGraphson> FromGraphson for Vec<T> {
    fn declared() -> TypeDesc {
        TypeDesc::list(T::declared())
    }

    fn from_value(value: Value) -> Result<Self> {
        elements::<Self>(value)?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

macro_rules! impl_set {
    ($set:ident, $($bound:path),+) => {
        impl<T> FromGraphson for $set<T>
        where
            T: FromGraphson $(+ $bound)+,
        {
            fn declared() -> TypeDesc {
                TypeDesc::set(T::declared())
            }

            fn from_value(value: Value) -> Result<Self> {
                elements::<Self>(value)?
                    .into_iter()
                    .map(T::from_value)
                    .collect()
            }
        }
    };
}

impl_set!(HashSet, Eq, Hash);
impl_set!(IndexSet, Eq, Hash);
impl_set!(BTreeSet, Ord);

macro_rules! impl_map {
    ($map:ident, $($bound:path),+) => {
        impl<K, V> FromGraphson for $map<K, V>
        where
            K: FromGraphson $(+ $bound)+,
            V: FromGraphson,
        {
            fn declared() -> TypeDesc {
                TypeDesc::map(K::declared(), V::declared())
            }

            fn from_value(value: Value) -> Result<Self> {
                entries::<Self>(value)?
                    .into_iter()
                    .map(|(key, entry)| Ok((K::from_value(key)?, V::from_value(entry)?)))
                    .collect()
            }
        }
    };
}

impl_map!(HashMap, Eq, Hash);
impl_map!(IndexMap, Eq, Hash);
impl_map!(BTreeMap, Ord);
