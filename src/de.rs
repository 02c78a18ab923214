//! Decoding wire tokens against a declared type.
//!
//! [`Engine::decode`] walks the dispatch precedence below; the first rule that matches wins.
//!
//! 1. `Lazy` wraps the token in a [`LazyNode`] without looking at it. `Scalar(Json)` returns the
//!    token unchanged.
//! 2. `null` is accepted by `Object` and `Optional` targets and rejected everywhere else.
//!    `Optional(inner)` around anything else decodes against `inner`.
//! 3. Untagged tokens: scalars go straight to the converter bridge, bare arrays to the
//!    collection codec, and untagged objects become string-keyed maps that are then bridged.
//! 4. `g:List`, `g:Set`, `g:Map`, and `g:BulkSet` use the built-in composite codecs.
//! 5. Any other tag goes to its registered decoder, whose result is coerced to the declared type.
//! 6. A tag nobody handles can only be satisfied by a converter from raw JSON to the declared
//!    scalar. Otherwise decoding fails with [`Error::Conversion`] naming the tag.

use crate::engine::Engine;
use crate::map::{ValueMap, ValueSet};
use crate::node::LazyNode;
use crate::types::{ScalarKind, SeqKind, TypeDesc};
use crate::value::{Value, ValueKind};
use crate::wire::{self, Token};
use crate::{Error, Result};
use num_bigint::BigInt;
use tracing::{debug, trace};

static OPAQUE: TypeDesc = TypeDesc::Object;
static COUNT: TypeDesc = TypeDesc::Scalar(ScalarKind::Int64);

/// Upper bound on the elements a bulk set may expand into.
pub const MAX_BULK_EXPANSION: usize = 1 << 24;

impl Engine {
    /// Decodes `token` into a value satisfying `declared`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use graphson_codec::{Engine, ScalarKind, TypeDesc, Value};
    /// use serde_json::json;
    ///
    /// let engine = Engine::default();
    /// let token = json!({"@type": "g:Set", "@value": [1, 2, 2, 3]});
    ///
    /// let set = engine.decode(&token, &TypeDesc::set(TypeDesc::Scalar(ScalarKind::Int32))).unwrap();
    /// assert_eq!(set.as_set().map(|s| s.len()), Some(3));
    /// assert!(set.as_set().unwrap().contains(&Value::from(2i32)));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedInput`] for tagged objects that are not well formed, odd-length map
    ///   payloads, invalid bulk set counts, and bulk sets expanding past [`MAX_BULK_EXPANSION`]
    /// - [`Error::UnsupportedTarget`] when a composite tag meets a shape it cannot produce
    /// - [`Error::DuplicateKey`] when a map repeats a key
    /// - [`Error::NullTarget`] when `null` meets a non-nullable type
    /// - [`Error::Conversion`] when nothing satisfies the declared type
    pub fn decode(&self, token: &Token, declared: &TypeDesc) -> Result<Value> {
        match declared {
            TypeDesc::Lazy => return Ok(Value::Node(LazyNode::new(token.clone(), self.clone()))),
            TypeDesc::Scalar(ScalarKind::Json) => return Ok(Value::Json(token.clone())),
            _ => {}
        }

        if token.is_null() {
            return if declared.accepts_null() {
                Ok(Value::Null)
            } else {
                Err(Error::null_target(declared))
            };
        }
        if let TypeDesc::Optional(inner) = declared {
            return self.decode(token, inner);
        }

        match token {
            Token::Array(items) => self.decode_collection(None, items, declared),
            Token::Object(fields) => match wire::split_tagged(fields)? {
                Some((tag, payload)) => self.decode_tagged(tag, payload, declared),
                None => self.decode_untagged_object(fields, declared),
            },
            scalar => self.converters().coerce(raw_scalar(scalar), declared),
        }
    }

    fn decode_tagged(&self, tag: &str, payload: &Token, declared: &TypeDesc) -> Result<Value> {
        match tag {
            wire::LIST | wire::SET => {
                let items = payload_array(tag, payload)?;
                self.decode_collection(Some(tag), items, declared)
            }
            wire::MAP => {
                let items = payload_array(tag, payload)?;
                self.decode_map(tag, items, declared)
            }
            wire::BULK_SET => {
                let items = payload_array(tag, payload)?;
                self.decode_bulk_set(items, declared)
            }
            _ => match self.plugins().decoder(tag) {
                Some(decoder) => {
                    trace!(tag, target = %declared, "decoding via plugin");
                    let value = decoder.decode_tag(payload, self)?;
                    self.converters().coerce(value, declared)
                }
                None => self.decode_unresolved(tag, payload, declared),
            },
        }
    }

    /// `g:List`, `g:Set`, and bare arrays.
    fn decode_collection(
        &self,
        tag: Option<&str>,
        items: &[Token],
        declared: &TypeDesc,
    ) -> Result<Value> {
        let (kind, elem) = match declared {
            TypeDesc::Seq(kind, elem) => (*kind, elem.as_ref()),
            TypeDesc::Object if tag == Some(wire::SET) => (SeqKind::Set, &OPAQUE),
            TypeDesc::Object => (SeqKind::List, &OPAQUE),
            other => {
                return Err(Error::unsupported_target(tag.unwrap_or("array"), other));
            }
        };
        trace!(tag = tag.unwrap_or("array"), len = items.len(), target = %declared, "decoding collection");

        let decoded = items.iter().map(|item| self.decode(item, elem));
        match kind {
            SeqKind::Set => decoded.collect::<Result<ValueSet>>().map(Value::Set),
            SeqKind::Array | SeqKind::List => decoded.collect::<Result<Vec<_>>>().map(Value::List),
        }
    }

    fn decode_map(&self, tag: &str, items: &[Token], declared: &TypeDesc) -> Result<Value> {
        let (key_desc, value_desc) = match declared {
            TypeDesc::Map(key, value) => (key.as_ref(), value.as_ref()),
            TypeDesc::Object => (&OPAQUE, &OPAQUE),
            other => return Err(Error::unsupported_target(tag, other)),
        };
        let pairs = flattened_pairs(tag, items)?;

        let mut map = ValueMap::with_capacity(pairs.len());
        for [key, value] in pairs {
            map.try_insert(self.decode(key, key_desc)?, self.decode(value, value_desc)?)?;
        }
        Ok(Value::Map(map))
    }

    /// Map targets read a bulk set as `element -> count`; everything else expands it.
    fn decode_bulk_set(&self, items: &[Token], declared: &TypeDesc) -> Result<Value> {
        if let TypeDesc::Map(..) = declared {
            return self.decode_map(wire::BULK_SET, items, declared);
        }
        let (kind, elem) = match declared {
            TypeDesc::Seq(kind, elem) => (*kind, elem.as_ref()),
            TypeDesc::Object => (SeqKind::List, &OPAQUE),
            other => return Err(Error::unsupported_target(wire::BULK_SET, other)),
        };

        let pairs = flattened_pairs(wire::BULK_SET, items)?;
        if kind == SeqKind::Set {
            let mut set = ValueSet::with_capacity(pairs.len());
            for [element, count] in pairs {
                let element = self.decode(element, elem)?;
                if self.decode_count(count)? > 0 {
                    set.insert(element);
                }
            }
            return Ok(Value::Set(set));
        }

        let mut counted = Vec::with_capacity(pairs.len());
        let mut total = 0usize;
        for [element, count] in pairs {
            let element = self.decode(element, elem)?;
            let count = self.decode_count(count)?;
            total = total
                .checked_add(count)
                .filter(|&n| n <= MAX_BULK_EXPANSION)
                .ok_or_else(|| {
                    Error::malformed(format!(
                        "{} expands past {} elements",
                        wire::BULK_SET,
                        MAX_BULK_EXPANSION
                    ))
                })?;
            counted.push((element, count));
        }

        let mut expanded = Vec::with_capacity(total);
        for (element, count) in counted {
            expanded.extend(std::iter::repeat(element).take(count));
        }
        Ok(Value::List(expanded))
    }

    fn decode_count(&self, token: &Token) -> Result<usize> {
        let count = match self.decode(token, &COUNT) {
            Ok(value) => value.as_i64(),
            Err(
                Error::Conversion { .. } | Error::NullTarget(_) | Error::UnsupportedTarget { .. },
            ) => None,
            Err(e) => return Err(e),
        };
        count
            .and_then(|c| usize::try_from(c).ok())
            .ok_or_else(|| {
                Error::malformed(format!(
                    "{} count must be a non-negative integer, found {}",
                    wire::BULK_SET,
                    token
                ))
            })
    }

    fn decode_untagged_object(
        &self,
        fields: &serde_json::Map<String, Token>,
        declared: &TypeDesc,
    ) -> Result<Value> {
        let (key_desc, value_desc) = match declared {
            TypeDesc::Map(key, value) => (key.as_ref(), value.as_ref()),
            _ => (&OPAQUE, &OPAQUE),
        };

        let mut map = ValueMap::with_capacity(fields.len());
        for (key, value) in fields {
            let key = self.decode(&Token::String(key.clone()), key_desc)?;
            map.try_insert(key, self.decode(value, value_desc)?)?;
        }
        self.converters().coerce(Value::Map(map), declared)
    }

    fn decode_unresolved(&self, tag: &str, payload: &Token, declared: &TypeDesc) -> Result<Value> {
        if let TypeDesc::Scalar(target) = declared {
            if let Some(converter) = self.converters().lookup(ValueKind::Json, *target) {
                trace!(tag, %target, "unresolved tag handed to json converter");
                let token = wire::tagged(tag, payload.clone());
                return converter.convert(Value::Json(token));
            }
        }
        debug!(tag, target = %declared, "no decoder registered for tag");
        Err(Error::conversion(tag, declared))
    }
}

/// Untagged JSON scalars: integers become `Int64` (or a big integer past `i64`), other numbers
/// `Double`.
fn raw_scalar(token: &Token) -> Value {
    match token {
        Token::Bool(b) => Value::Bool(*b),
        Token::String(s) => Value::String(s.clone()),
        Token::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::BigInt(BigInt::from(u))
            } else {
                Value::from(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        other => Value::Json(other.clone()),
    }
}

fn payload_array<'a>(tag: &str, payload: &'a Token) -> Result<&'a [Token]> {
    payload.as_array().map(Vec::as_slice).ok_or_else(|| {
        Error::malformed(format!(
            "{} payload must be an array, found {}",
            tag,
            wire::describe(payload)
        ))
    })
}

fn flattened_pairs<'a>(tag: &str, items: &'a [Token]) -> Result<Vec<[&'a Token; 2]>> {
    if items.len() % 2 != 0 {
        return Err(Error::malformed(format!(
            "{} payload has odd length {}",
            tag,
            items.len()
        )));
    }
    Ok(items
        .chunks_exact(2)
        .map(|pair| [&pair[0], &pair[1]])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConverterRegistry;
    use crate::options::EngineOptions;
    use serde_json::json;

    fn scalar(kind: ScalarKind) -> TypeDesc {
        TypeDesc::Scalar(kind)
    }

    #[test]
    fn test_lazy_wraps_anything() {
        let engine = Engine::default();
        let token = json!({"@type": "custom:Unknown", "@value": 42});
        let value = engine.decode(&token, &TypeDesc::Lazy).unwrap();
        assert_eq!(value.as_node().map(|n| n.token()), Some(&token));
    }

    #[test]
    fn test_json_target_returns_token() {
        let token = json!({"@type": "g:Int32", "@value": 1});
        let value = Engine::default().decode(&token, &scalar(ScalarKind::Json)).unwrap();
        assert_eq!(value, Value::Json(token));
    }

    #[test]
    fn test_null_handling() {
        let engine = Engine::default();
        assert_eq!(engine.decode(&Token::Null, &TypeDesc::Object).unwrap(), Value::Null);
        assert_eq!(
            engine
                .decode(&Token::Null, &TypeDesc::optional(scalar(ScalarKind::Int32)))
                .unwrap(),
            Value::Null
        );
        assert!(matches!(
            engine.decode(&Token::Null, &scalar(ScalarKind::Int32)),
            Err(Error::NullTarget(_))
        ));
    }

    #[test]
    fn test_optional_decodes_inner() {
        let engine = Engine::default();
        let declared = TypeDesc::optional(scalar(ScalarKind::Int32));
        assert_eq!(
            engine.decode(&json!({"@type": "g:Int64", "@value": 3}), &declared).unwrap(),
            Value::from(3i32)
        );
    }

    #[test]
    fn test_raw_scalars() {
        let engine = Engine::default();
        assert_eq!(engine.decode_opaque(&json!(5)).unwrap(), Value::from(5i64));
        assert_eq!(engine.decode_opaque(&json!(1.5)).unwrap(), Value::from(1.5f64));
        assert_eq!(
            engine.decode_opaque(&json!(u64::MAX)).unwrap(),
            Value::BigInt(BigInt::from(u64::MAX))
        );
        assert_eq!(
            engine.decode(&json!(5), &scalar(ScalarKind::Int32)).unwrap(),
            Value::from(5i32)
        );
    }

    #[test]
    fn test_list_preserves_order_and_duplicates() {
        let engine = Engine::default();
        let token = json!({"@type": "g:List", "@value": [3, 1, 3]});
        let value = engine
            .decode(&token, &TypeDesc::list(scalar(ScalarKind::Int32)))
            .unwrap();
        assert_eq!(value, Value::from(vec![3i32, 1, 3]));
    }

    #[test]
    fn test_opaque_collection_shape_follows_tag() {
        let engine = Engine::default();
        let set = engine
            .decode_opaque(&json!({"@type": "g:Set", "@value": [1, 2, 2, 3]}))
            .unwrap();
        assert_eq!(set.as_set().map(|s| s.len()), Some(3));

        let list = engine.decode_opaque(&json!([1, 1])).unwrap();
        assert_eq!(list.as_list().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_bare_array_against_set() {
        let engine = Engine::default();
        let value = engine
            .decode(&json!(["a", "a", "b"]), &TypeDesc::set(scalar(ScalarKind::String)))
            .unwrap();
        assert_eq!(value.as_set().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_collection_against_scalar_is_unsupported() {
        let engine = Engine::default();
        let err = engine
            .decode(
                &json!({"@type": "g:List", "@value": [1]}),
                &scalar(ScalarKind::Int32),
            )
            .unwrap_err();
        match err {
            Error::UnsupportedTarget { tag, target } => {
                assert_eq!(tag, "g:List");
                assert_eq!(target, "Int32");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_map_decoding() {
        let engine = Engine::default();
        let token = json!({"@type": "g:Map", "@value": ["b", 2, "a", 1]});
        let declared = TypeDesc::map(scalar(ScalarKind::String), scalar(ScalarKind::Int32));
        let value = engine.decode(&token, &declared).unwrap();
        let map = value.as_map().unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("b"), Value::from("a")]);
        assert_eq!(map.get_str("a"), Some(&Value::from(1i32)));
    }

    #[test]
    fn test_map_with_composite_keys() {
        let engine = Engine::default();
        let token = json!({"@type": "g:Map", "@value": [
            {"@type": "g:List", "@value": [1, 2]}, "pair"
        ]});
        let value = engine.decode_opaque(&token).unwrap();
        let key = Value::from(vec![1i64, 2]);
        assert_eq!(value.as_map().and_then(|m| m.get(&key)), Some(&Value::from("pair")));
    }

    #[test]
    fn test_map_duplicate_key() {
        let token = json!({"@type": "g:Map", "@value": ["a", 1, "a", 2]});
        assert!(matches!(
            Engine::default().decode_opaque(&token),
            Err(Error::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_map_odd_length() {
        let token = json!({"@type": "g:Map", "@value": ["a", 1, "b"]});
        assert!(matches!(
            Engine::default().decode_opaque(&token),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_map_against_list_is_unsupported() {
        let token = json!({"@type": "g:Map", "@value": []});
        let declared = TypeDesc::list(TypeDesc::Object);
        assert!(matches!(
            Engine::default().decode(&token, &declared),
            Err(Error::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn test_bulk_set_expands() {
        let engine = Engine::default();
        let token = json!({"@type": "g:BulkSet", "@value": ["x", 2, "y", 1]});
        let list = engine
            .decode(&token, &TypeDesc::list(scalar(ScalarKind::String)))
            .unwrap();
        assert_eq!(list, Value::from(vec!["x", "x", "y"]));

        let set = engine
            .decode(&token, &TypeDesc::set(scalar(ScalarKind::String)))
            .unwrap();
        assert_eq!(set.as_set().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_bulk_set_as_map() {
        let engine = Engine::default();
        let token = json!({"@type": "g:BulkSet", "@value": ["x", 2, "y", {"@type": "g:Int64", "@value": 1}]});
        let declared = TypeDesc::map(scalar(ScalarKind::String), scalar(ScalarKind::Int64));
        let value = engine.decode(&token, &declared).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get_str("x"), Some(&Value::from(2i64)));
        assert_eq!(map.get_str("y"), Some(&Value::from(1i64)));
    }

    #[test]
    fn test_bulk_set_bad_counts() {
        let engine = Engine::default();
        for count in [json!(-1), json!(1.5), json!(null), json!([1])] {
            let token = json!({"@type": "g:BulkSet", "@value": ["x", count]});
            let err = engine.decode_opaque(&token).unwrap_err();
            assert!(
                matches!(err, Error::MalformedInput(_)),
                "count {} gave {:?}",
                count,
                err
            );
        }
    }

    #[test]
    fn test_bulk_set_huge_count_into_set() {
        let token = json!({"@type": "g:BulkSet", "@value": ["x", i64::MAX, "y", 0, "x", 3]});
        let set = Engine::default()
            .decode(&token, &TypeDesc::set(scalar(ScalarKind::String)))
            .unwrap();
        assert_eq!(set, Value::Set(vec![Value::from("x")].into_iter().collect()));
    }

    #[test]
    fn test_bulk_set_expansion_is_bounded() {
        let engine = Engine::default();
        let huge = json!({"@type": "g:BulkSet", "@value": ["x", i64::MAX]});
        for declared in [
            TypeDesc::list(scalar(ScalarKind::String)),
            TypeDesc::array(scalar(ScalarKind::String)),
            TypeDesc::Object,
        ] {
            assert!(matches!(
                engine.decode(&huge, &declared),
                Err(Error::MalformedInput(_))
            ));
        }

        // each count fits, the sum does not
        let half = MAX_BULK_EXPANSION as i64 / 2 + 1;
        let split = json!({"@type": "g:BulkSet", "@value": ["x", half, "y", half]});
        assert!(matches!(
            engine.decode_opaque(&split),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_bulk_set_zero_count() {
        let token = json!({"@type": "g:BulkSet", "@value": ["x", 0, "y", 1]});
        let value = Engine::default().decode_opaque(&token).unwrap();
        assert_eq!(value, Value::from(vec!["y"]));
    }

    #[test]
    fn test_untagged_object_is_string_keyed_map() {
        let engine = Engine::default();
        let value = engine.decode_opaque(&json!({"name": "marko", "age": 29})).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get_str("age"), Some(&Value::from(29i64)));

        let declared = TypeDesc::map(scalar(ScalarKind::Int32), scalar(ScalarKind::String));
        let value = engine.decode(&json!({"1": "one"}), &declared).unwrap();
        assert_eq!(
            value.as_map().and_then(|m| m.get(&Value::from(1i32))),
            Some(&Value::from("one"))
        );
    }

    #[test]
    fn test_unknown_tag_names_tag() {
        let token = json!({"@type": "custom:Unknown", "@value": 42});
        let err = Engine::default().decode_opaque(&token).unwrap_err();
        match &err {
            Error::Conversion { source_type, .. } => assert_eq!(source_type, "custom:Unknown"),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains("custom:Unknown"));
    }

    #[test]
    fn test_unknown_tag_json_converter() {
        let converters = ConverterRegistry::builder()
            .register(ValueKind::Json, ScalarKind::String, |value| match value {
                Value::Json(token) => Ok(Value::from(wire::tag_of(&token).unwrap_or_default())),
                other => Ok(other),
            })
            .build();
        let engine = Engine::new(EngineOptions::new().with_converters(converters));
        let token = json!({"@type": "custom:Unknown", "@value": 42});
        assert_eq!(
            engine.decode(&token, &scalar(ScalarKind::String)).unwrap(),
            Value::from("custom:Unknown")
        );
    }

    #[test]
    fn test_malformed_tagged_object() {
        let engine = Engine::default();
        assert!(matches!(
            engine.decode_opaque(&json!({"@type": "g:Int32"})),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            engine.decode_opaque(&json!({"@type": "g:List", "@value": 1})),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_plugin_result_is_coerced() {
        let engine = Engine::default();
        let token = json!({"@type": "g:Int32", "@value": 12});
        assert_eq!(
            engine.decode(&token, &scalar(ScalarKind::String)).unwrap(),
            Value::from("12")
        );
        assert!(matches!(
            engine.decode(&token, &scalar(ScalarKind::Bool)),
            Err(Error::Conversion { .. })
        ));
    }

    #[test]
    fn test_lazy_elements() {
        let engine = Engine::default();
        let token = json!({"@type": "g:List", "@value": [{"@type": "g:Int32", "@value": 1}, "a"]});
        let value = engine.decode(&token, &TypeDesc::list(TypeDesc::Lazy)).unwrap();
        let items = value.as_list().unwrap();
        assert!(items.iter().all(Value::is_node));
        let first = items[0].as_node().unwrap();
        assert_eq!(first.materialize(&TypeDesc::Object).unwrap(), Value::from(1i32));
    }
}
