//! Dynamic host-value representation for decoded GraphSON data.
//!
//! [`Value`] is what the engine produces when it decodes a token and what it consumes when it
//! encodes one. Unlike the JSON token tree it is typed: integers keep their wire width, sets and
//! maps are real containers, and dates, big integers, and byte buffers are first-class.
//!
//! ## Core Types
//!
//! - [`Value`]: any decoded value, including [`LazyNode`] wrappers and raw JSON
//! - [`Number`]: the four GraphSON numeric widths (`g:Int32`, `g:Int64`, `g:Float`, `g:Double`)
//! - [`ValueKind`]: the runtime kind of a value, used to key encoders and converters
//!
//! ## Equality
//!
//! Values implement `Eq` and `Hash` so they can be set elements and map keys. Floating point
//! numbers compare by bit pattern, so `NaN == NaN` and `0.0 != -0.0`. Sets and maps compare
//! regardless of insertion order.
//!
//! ```rust
//! use graphson_codec::{Value, ValueKind};
//!
//! let value = Value::from(42);
//! assert_eq!(value.kind(), ValueKind::Int32);
//! assert_eq!(value.as_i64(), Some(42));
//!
//! assert_eq!(Value::from(f64::NAN), Value::from(f64::NAN));
//! ```

use crate::map::{ValueMap, ValueSet};
use crate::node::LazyNode;
use crate::wire::Token;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A dynamically-typed decoded value.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Int64(42));
/// let text = Value::from("hello");
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert_eq!(text.as_str(), Some("hello"));
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    BigInt(BigInt),
    String(String),
    Bytes(Vec<u8>),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Set(ValueSet),
    Map(ValueMap),
    /// A token whose materialization was deferred
    Node(LazyNode),
    /// A raw token, returned when the caller declared [`ScalarKind::Json`](crate::ScalarKind::Json)
    Json(Token),
}

/// A numeric value carrying its GraphSON width.
///
/// # Examples
///
/// ```rust
/// use graphson_codec::Number;
///
/// assert_eq!(Number::Int32(7).as_i64(), Some(7));
/// assert_eq!(Number::Double(7.0).as_i64(), None);
/// assert_eq!(Number::Float(1.5).as_f64(), 1.5);
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    /// Returns `true` for the two integer widths.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Int32(_) | Number::Int64(_))
    }

    /// Returns the integer value for `Int32` and `Int64`; floating point widths return `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int32(i) => Some(i64::from(*i)),
            Number::Int64(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int32(i) => f64::from(*i),
            Number::Int64(i) => *i as f64,
            Number::Float(f) => f64::from(*f),
            Number::Double(d) => *d,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Number::Int32(_) => ValueKind::Int32,
            Number::Int64(_) => ValueKind::Int64,
            Number::Float(_) => ValueKind::Float,
            Number::Double(_) => ValueKind::Double,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int32(a), Number::Int32(b)) => a == b,
            (Number::Int64(a), Number::Int64(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            (Number::Double(a), Number::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Number::Int32(i) => i.hash(state),
            Number::Int64(i) => i.hash(state),
            Number::Float(f) => f.to_bits().hash(state),
            Number::Double(d) => d.to_bits().hash(state),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int32(i) => write!(f, "{}", i),
            Number::Int64(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
            Number::Double(d) => write!(f, "{}", d),
        }
    }
}

/// The runtime kind of a [`Value`].
///
/// Encoders are registered per kind, and converters are keyed by (source kind, target kind).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Null,
    Bool,
    Int32,
    Int64,
    Float,
    Double,
    BigInt,
    String,
    Bytes,
    Date,
    List,
    Set,
    Map,
    Node,
    Json,
}

impl ValueKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Bool",
            ValueKind::Int32 => "Int32",
            ValueKind::Int64 => "Int64",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::BigInt => "BigInt",
            ValueKind::String => "String",
            ValueKind::Bytes => "Bytes",
            ValueKind::Date => "Date",
            ValueKind::List => "List",
            ValueKind::Set => "Set",
            ValueKind::Map => "Map",
            ValueKind::Node => "LazyNode",
            ValueKind::Json => "Json",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the runtime kind of this value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::{Value, ValueKind};
    ///
    /// assert_eq!(Value::from(1i64).kind(), ValueKind::Int64);
    /// assert_eq!(Value::from(vec![1, 2]).kind(), ValueKind::List);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) => n.kind(),
            Value::BigInt(_) => ValueKind::BigInt,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Date(_) => ValueKind::Date,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
            Value::Map(_) => ValueKind::Map,
            Value::Node(_) => ValueKind::Node,
            Value::Json(_) => ValueKind::Json,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Value::Node(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an `Int32` or `Int64`, returns it widened to `i64`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<&LazyNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(bi) => Some(bi),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => n.hash(state),
            Value::BigInt(bi) => bi.hash(state),
            Value::String(s) => s.hash(state),
            Value::Bytes(bytes) => bytes.hash(state),
            Value::Date(dt) => dt.hash(state),
            Value::List(items) => items.hash(state),
            Value::Set(set) => set.hash(state),
            Value::Map(map) => map.hash(state),
            Value::Node(node) => hash_token(node.token(), state),
            Value::Json(token) => hash_token(token, state),
        }
    }
}

pub(crate) fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// Object fields are combined order-independently so the hash agrees with `Token`'s equality
// whether or not serde_json preserves insertion order.
pub(crate) fn hash_token<H: Hasher>(token: &Token, state: &mut H) {
    std::mem::discriminant(token).hash(state);
    match token {
        Token::Null => {}
        Token::Bool(b) => b.hash(state),
        Token::Number(n) => n.to_string().hash(state),
        Token::String(s) => s.hash(state),
        Token::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_token(item, state);
            }
        }
        Token::Object(fields) => {
            let combined = fields.iter().fold(0u64, |acc, (key, value)| {
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                hash_token(value, &mut hasher);
                acc.wrapping_add(hasher.finish())
            });
            fields.len().hash(state);
            combined.hash(state);
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(bi) => write!(f, "{}", bi),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::Date(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::List(items) => {
                write!(
                    f,
                    "[{}]",
                    items
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            Value::Set(set) => {
                write!(
                    f,
                    "{{{}}}",
                    set.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
            Value::Map(map) => {
                write!(
                    f,
                    "{{{}}}",
                    map.iter()
                        .map(|(k, v)| format!("{}: {}", k, v))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Node(node) => write!(f, "{}", node.token()),
            Value::Json(token) => write!(f, "{}", token),
        }
    }
}

/// Serializes the untagged view of a value: the plain JSON a client would show a user, not the
/// GraphSON wire form. Use [`Engine::encode`](crate::Engine::encode) for the latter.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use base64::Engine as _;

        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Int32(i)) => serializer.serialize_i32(*i),
            Value::Number(Number::Int64(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f32(*f),
            Value::Number(Number::Double(d)) => serializer.serialize_f64(*d),
            Value::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => serializer
                .serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes)),
            Value::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::List(items) => serializer.collect_seq(items),
            Value::Set(set) => serializer.collect_seq(set.iter()),
            Value::Map(map) => serializer.collect_map(map.iter()),
            Value::Node(node) => node.token().serialize(serializer),
            Value::Json(token) => token.serialize(serializer),
        }
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Number(Number::Int32(i32::from(value)))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Number(Number::Int32(i32::from(value)))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Int32(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Int64(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(Number::Int32(i32::from(value)))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Number(Number::Int32(i32::from(value)))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Int64(i64::from(value)))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Double(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<ValueSet> for Value {
    fn from(value: ValueSet) -> Self {
        Value::Set(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl From<LazyNode> for Value {
    fn from(value: LazyNode) -> Self {
        Value::Node(value)
    }
}
