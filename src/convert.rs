//! Scalar converter registry and the bridge that applies it.
//!
//! The bridge is the last stop of every decode path: whatever a token decoded into, it must end
//! up satisfying the caller's declared type. [`ConverterRegistry::bridge`] answers with a tagged
//! [`Bridged`] outcome instead of failing, so the engine can decide what to try next:
//!
//! 1. `null` is accepted only by nullable declared types
//! 2. a value whose kind already matches passes through untouched
//! 3. containers are coerced element by element
//! 4. a registered converter keyed by (runtime kind, declared scalar) is applied
//! 5. otherwise the value comes back [`Bridged::Unsatisfied`]
//!
//! [`ConverterRegistry::coerce`] finishes the job with a lossless representational cast (numeric
//! widening or narrowing, materializing a [`LazyNode`](crate::LazyNode)) and raises
//! [`Error::Conversion`] when even that fails.
//!
//! ## Examples
//!
//! ```rust
//! use graphson_codec::{ConverterRegistry, ScalarKind, TypeDesc, Value, ValueKind};
//!
//! let registry = ConverterRegistry::builder()
//!     .register(ValueKind::Bool, ScalarKind::Int32, |value| {
//!         Ok(Value::from(i32::from(value.as_bool() == Some(true))))
//!     })
//!     .build();
//!
//! let declared = TypeDesc::Scalar(ScalarKind::Int32);
//! assert_eq!(registry.coerce(Value::from(true), &declared).unwrap(), Value::from(1));
//! ```

use crate::map::{ValueMap, ValueSet};
use crate::types::{ScalarKind, SeqKind, TypeDesc};
use crate::value::{Number, ValueKind};
use crate::{Error, Result, Value};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

/// A scalar conversion from one runtime kind to a declared scalar kind.
///
/// Implemented for any `Fn(Value) -> Result<Value> + Send + Sync`.
pub trait Converter: Send + Sync {
    fn convert(&self, value: Value) -> Result<Value>;
}

impl<F> Converter for F
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn convert(&self, value: Value) -> Result<Value> {
        self(value)
    }
}

/// The outcome of offering a value to the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Bridged {
    /// The value satisfies the declared type
    Satisfied(Value),
    /// No rule applied; the value is returned unconverted
    Unsatisfied(Value),
}

impl Bridged {
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Bridged::Satisfied(_))
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Bridged::Satisfied(value) | Bridged::Unsatisfied(value) => value,
        }
    }
}

type ConverterMap = HashMap<(ValueKind, ScalarKind), Arc<dyn Converter>>;

/// An immutable lookup of scalar converters keyed by (source kind, target kind).
///
/// Cloning is cheap: clones share the same table.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Arc<ConverterMap>,
}

impl ConverterRegistry {
    /// A registry with no converters; only exact matches and lossless casts succeed.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default catalog: dates, numeric strings, and string rendering of scalars.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::{ConverterRegistry, ScalarKind, ValueKind};
    ///
    /// let registry = ConverterRegistry::standard();
    /// assert!(registry.lookup(ValueKind::Int64, ScalarKind::Date).is_some());
    /// assert!(registry.lookup(ValueKind::String, ScalarKind::Int32).is_some());
    /// ```
    #[must_use]
    pub fn standard() -> Self {
        Self::builder().with_standard().build()
    }

    #[must_use]
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::default()
    }

    #[must_use]
    pub fn lookup(&self, from: ValueKind, to: ScalarKind) -> Option<&dyn Converter> {
        self.converters.get(&(from, to)).map(|c| c.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Offers `value` to the declared type without casting.
    ///
    /// # Errors
    ///
    /// Fails on `null` against a non-nullable type, when an applied converter fails, or when an
    /// element of a container cannot be coerced.
    pub fn bridge(&self, value: Value, declared: &TypeDesc) -> Result<Bridged> {
        if value.is_null() {
            return if declared.accepts_null() {
                Ok(Bridged::Satisfied(Value::Null))
            } else {
                Err(Error::null_target(declared))
            };
        }

        match declared {
            TypeDesc::Object => Ok(Bridged::Satisfied(value)),
            TypeDesc::Optional(inner) => self.bridge(value, inner),
            TypeDesc::Lazy => Ok(if value.is_node() {
                Bridged::Satisfied(value)
            } else {
                Bridged::Unsatisfied(value)
            }),
            TypeDesc::Scalar(target) => {
                let kind = value.kind();
                if kind == target.value_kind() {
                    return Ok(Bridged::Satisfied(value));
                }
                match self.lookup(kind, *target) {
                    Some(converter) => {
                        trace!(from = %kind, to = %target, "applying converter");
                        converter.convert(value).map(Bridged::Satisfied)
                    }
                    None => Ok(Bridged::Unsatisfied(value)),
                }
            }
            TypeDesc::Seq(kind, elem) => match value {
                Value::List(items) => self.collect_seq(items, *kind, elem).map(Bridged::Satisfied),
                Value::Set(set) => self.collect_seq(set, *kind, elem).map(Bridged::Satisfied),
                other => Ok(Bridged::Unsatisfied(other)),
            },
            TypeDesc::Map(key_desc, value_desc) => match value {
                Value::Map(map) => {
                    let mut coerced = ValueMap::with_capacity(map.len());
                    for (key, entry) in map {
                        coerced.try_insert(
                            self.coerce(key, key_desc)?,
                            self.coerce(entry, value_desc)?,
                        )?;
                    }
                    Ok(Bridged::Satisfied(Value::Map(coerced)))
                }
                other => Ok(Bridged::Unsatisfied(other)),
            },
        }
    }

    /// Bridges `value` and falls back to a representational cast.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] naming the runtime kind and the declared type when no
    /// path satisfies the declared type.
    pub fn coerce(&self, value: Value, declared: &TypeDesc) -> Result<Value> {
        match self.bridge(value, declared)? {
            Bridged::Satisfied(value) => Ok(value),
            Bridged::Unsatisfied(value) => cast(value, declared),
        }
    }

    fn collect_seq<I>(&self, items: I, kind: SeqKind, elem: &TypeDesc) -> Result<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let coerced = items.into_iter().map(|item| self.coerce(item, elem));
        match kind {
            SeqKind::Set => coerced.collect::<Result<ValueSet>>().map(Value::Set),
            SeqKind::Array | SeqKind::List => coerced.collect::<Result<Vec<_>>>().map(Value::List),
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.converters.keys().collect();
        keys.sort();
        f.debug_struct("ConverterRegistry")
            .field("converters", &keys)
            .finish()
    }
}

/// Collects converters before freezing them into a [`ConverterRegistry`].
#[derive(Default)]
pub struct ConverterRegistryBuilder {
    converters: ConverterMap,
}

impl ConverterRegistryBuilder {
    /// Registers a conversion function, replacing any previous one for the same pair.
    #[must_use]
    pub fn register<F>(self, from: ValueKind, to: ScalarKind, convert: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_converter(from, to, convert)
    }

    #[must_use]
    pub fn register_converter<C>(mut self, from: ValueKind, to: ScalarKind, converter: C) -> Self
    where
        C: Converter + 'static,
    {
        self.converters.insert((from, to), Arc::new(converter));
        self
    }

    /// Adds the catalog of [`ConverterRegistry::standard`].
    #[must_use]
    pub fn with_standard(self) -> Self {
        self.register(ValueKind::Int32, ScalarKind::Date, millis_to_date)
            .register(ValueKind::Int64, ScalarKind::Date, millis_to_date)
            .register(ValueKind::String, ScalarKind::Date, rfc3339_to_date)
            .register(ValueKind::Date, ScalarKind::Int64, date_to_millis)
            .register(ValueKind::Date, ScalarKind::String, render_string)
            .register(ValueKind::Bool, ScalarKind::String, render_string)
            .register(ValueKind::Int32, ScalarKind::String, render_string)
            .register(ValueKind::Int64, ScalarKind::String, render_string)
            .register(ValueKind::Float, ScalarKind::String, render_string)
            .register(ValueKind::Double, ScalarKind::String, render_string)
            .register(ValueKind::BigInt, ScalarKind::String, render_string)
            .register(ValueKind::String, ScalarKind::Bool, |v| {
                parse_string::<bool>(v, ScalarKind::Bool)
            })
            .register(ValueKind::String, ScalarKind::Int32, |v| {
                parse_string::<i32>(v, ScalarKind::Int32)
            })
            .register(ValueKind::String, ScalarKind::Int64, |v| {
                parse_string::<i64>(v, ScalarKind::Int64)
            })
            .register(ValueKind::String, ScalarKind::Double, |v| {
                parse_string::<f64>(v, ScalarKind::Double)
            })
            .register(ValueKind::String, ScalarKind::BigInt, |v| {
                parse_string::<BigInt>(v, ScalarKind::BigInt)
            })
    }

    #[must_use]
    pub fn build(self) -> ConverterRegistry {
        ConverterRegistry {
            converters: Arc::new(self.converters),
        }
    }
}

fn millis_to_date(value: Value) -> Result<Value> {
    value
        .as_i64()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(Value::Date)
        .ok_or_else(|| Error::conversion(value.kind(), ScalarKind::Date))
}

fn rfc3339_to_date(value: Value) -> Result<Value> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| Value::Date(dt.with_timezone(&Utc)))
        .ok_or_else(|| Error::conversion(value.kind(), ScalarKind::Date))
}

fn date_to_millis(value: Value) -> Result<Value> {
    match value {
        Value::Date(dt) => Ok(Value::from(dt.timestamp_millis())),
        other => Err(Error::conversion(other.kind(), ScalarKind::Int64)),
    }
}

fn render_string(value: Value) -> Result<Value> {
    Ok(Value::String(value.to_string()))
}

fn parse_string<T>(value: Value, target: ScalarKind) -> Result<Value>
where
    T: FromStr + Into<Value>,
{
    value
        .as_str()
        .and_then(|s| s.trim().parse::<T>().ok())
        .map(Into::into)
        .ok_or_else(|| Error::conversion(value.kind(), target))
}

/// Lossless representational cast, tried after the bridge came back unsatisfied.
pub(crate) fn cast(value: Value, declared: &TypeDesc) -> Result<Value> {
    if let Value::Node(node) = &value {
        return node.materialize(declared);
    }
    let cast = match declared.non_null() {
        TypeDesc::Scalar(target) => cast_number(&value, *target),
        _ => None,
    };
    cast.ok_or_else(|| Error::conversion(value.kind(), declared))
}

fn cast_number(value: &Value, target: ScalarKind) -> Option<Value> {
    match target {
        ScalarKind::Int32 => exact_i64(value)
            .and_then(|i| i32::try_from(i).ok())
            .map(Value::from),
        ScalarKind::Int64 => exact_i64(value).map(Value::from),
        ScalarKind::BigInt => exact_i64(value).map(|i| Value::BigInt(BigInt::from(i))),
        ScalarKind::Double => exact_f64(value).map(Value::from),
        ScalarKind::Float => exact_f32(value).map(Value::from),
        _ => None,
    }
}

// Largest magnitude where every integer is representable in an f64 / f32 mantissa.
const F64_EXACT: u64 = 1 << 53;
const F32_EXACT: u64 = 1 << 24;

fn exact_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(Number::Int32(i)) => Some(i64::from(*i)),
        Value::Number(Number::Int64(i)) => Some(*i),
        Value::Number(Number::Float(f)) => whole(f64::from(*f)),
        Value::Number(Number::Double(d)) => whole(*d),
        Value::BigInt(bi) => i64::try_from(bi).ok(),
        _ => None,
    }
}

fn whole(d: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if d.fract() == 0.0 && d >= -LIMIT && d < LIMIT {
        Some(d as i64)
    } else {
        None
    }
}

fn exact_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(Number::Float(f)) => Some(f64::from(*f)),
        Value::Number(Number::Double(d)) => Some(*d),
        _ => exact_i64(value)
            .filter(|i| i.unsigned_abs() <= F64_EXACT)
            .map(|i| i as f64),
    }
}

fn exact_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Number(Number::Float(f)) => Some(*f),
        Value::Number(Number::Double(d)) => {
            let narrowed = *d as f32;
            (f64::from(narrowed) == *d || d.is_nan()).then_some(narrowed)
        }
        _ => exact_i64(value)
            .filter(|i| i.unsigned_abs() <= F32_EXACT)
            .map(|i| i as f32),
    }
}
