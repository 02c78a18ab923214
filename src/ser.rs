//! Encoding host values to wire tokens.
//!
//! [`Engine::encode`] looks up the encoder registered for a value's runtime [`ValueKind`]. The
//! encoder may recurse into the engine for nested values and returns either a payload, which the
//! engine wraps with the encoder's tag, or a complete token. Values without an encoder are
//! emitted untagged when JSON can carry them as is:
//!
//! | Value | Untagged form |
//! |-------|---------------|
//! | `Null`, `Bool`, `String` | the JSON scalar |
//! | finite numbers | a JSON number |
//! | `Json` | the held token |
//! | `Node` | the held token, undecoded |
//!
//! Anything else fails with [`Error::UnsupportedType`].
//!
//! The module also provides [`ValueSerializer`], a `serde::Serializer` that builds a [`Value`]
//! from any `T: Serialize`, so application structs can be encoded without hand-building maps.

use crate::engine::Engine;
use crate::map::{ValueMap, ValueSet};
use crate::plugin::Encoded;
use crate::value::{Number, Value};
use crate::wire::{self, Token};
use crate::{Error, Result};
use num_bigint::BigInt;
use serde::ser::{self, Serialize};
use tracing::trace;

impl Engine {
    /// Encodes a host value into a wire token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::{Engine, Value};
    /// use serde_json::json;
    ///
    /// let engine = Engine::default();
    /// let token = engine.encode(&Value::from(vec![1i32, 2])).unwrap();
    /// assert_eq!(
    ///     token,
    ///     json!({"@type": "g:List", "@value": [
    ///         {"@type": "g:Int32", "@value": 1},
    ///         {"@type": "g:Int32", "@value": 2}
    ///     ]})
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] when no encoder is registered for the value's kind and
    /// it has no untagged form, or whatever error a registered encoder raises.
    pub fn encode(&self, value: &Value) -> Result<Token> {
        let kind = value.kind();
        if let Some(encoder) = self.plugins().encoder(kind) {
            trace!(%kind, tag = encoder.tag(), "encoding via plugin");
            return match encoder.encode_tag(value, self)? {
                Encoded::Payload(payload) => Ok(wire::tagged(encoder.tag(), payload)),
                Encoded::Token(token) => Ok(token),
            };
        }
        encode_untagged(value)
    }
}

fn encode_untagged(value: &Value) -> Result<Token> {
    match value {
        Value::Null => Ok(Token::Null),
        Value::Bool(b) => Ok(Token::Bool(*b)),
        Value::String(s) => Ok(Token::String(s.clone())),
        Value::Number(Number::Int32(i)) => Ok(Token::from(*i)),
        Value::Number(Number::Int64(i)) => Ok(Token::from(*i)),
        Value::Number(n) => serde_json::Number::from_f64(n.as_f64())
            .map(Token::Number)
            .ok_or_else(|| {
                Error::unsupported_type(&format!("non-finite {} without an encoder", n.kind()))
            }),
        Value::Json(token) => Ok(token.clone()),
        Value::Node(node) => Ok(node.token().clone()),
        other => Err(Error::unsupported_type(&format!(
            "no encoder registered for {}",
            other.kind()
        ))),
    }
}

/// Builds a [`Value`] from any `T: Serialize`.
///
/// Integers keep their width (`i32` and narrower become `Int32`, `i64` and `u32` become `Int64`),
/// `u64` beyond `i64::MAX` becomes a big integer, byte slices become [`Value::Bytes`], and
/// structs and maps become [`Value::Map`] with string field names as keys.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: ValueMap,
    current_key: Option<Value>,
}

/// A newtype variant `V(x)` serialized as the single-entry map `{"V": x}`.
fn single_entry(variant: &'static str, value: Value) -> Value {
    let mut map = ValueMap::with_capacity(1);
    map.insert(Value::from(variant), value);
    Value::Map(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::from(i)),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(single_entry(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }
}

impl SerializeMap {
    fn with_capacity(capacity: usize) -> Self {
        SerializeMap {
            map: ValueMap::with_capacity(capacity),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::List(self.vec))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    /// Keys may be any value; the wire format allows composite map keys.
    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.try_insert(key, to_value(value)?)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(Value::from(key), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(Value::from(key), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use graphson_codec::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Person { name: String, age: i32 }
///
/// let value = to_value(&Person { name: "marko".into(), age: 29 }).unwrap();
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get_str("age"), Some(&Value::from(29)));
/// ```
///
/// # Errors
///
/// Fails on tuple and struct enum variants, and on maps that repeat a key.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Converts a sequence of serializable items into a de-duplicating [`Value::Set`].
///
/// # Errors
///
/// Fails if any item fails [`to_value`].
pub fn to_set<'a, I, T>(items: I) -> Result<Value>
where
    I: IntoIterator<Item = &'a T>,
    T: 'a + ?Sized + Serialize,
{
    items
        .into_iter()
        .map(to_value)
        .collect::<Result<ValueSet>>()
        .map(Value::Set)
}
