//! Property-based tests for the encode/decode round trip.
//!
//! Every value a typed caller can produce must survive `encode` followed by `decode_as` with the
//! same Rust type, without relying on any converter.

use graphson_codec::{
    ConverterRegistry, Engine, EngineOptions, FromGraphson, Value, ValueMap, ValueSet,
};
use indexmap::IndexMap;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Debug;

fn engine() -> Engine {
    Engine::new(EngineOptions::new().with_converters(ConverterRegistry::empty()))
}

fn roundtrip<T>(value: Value) -> Result<T, String>
where
    T: FromGraphson,
{
    let engine = engine();
    let token = engine
        .encode(&value)
        .map_err(|e| format!("encode failed: {}", e))?;
    engine
        .decode_as::<T>(&token)
        .map_err(|e| format!("decode of {} failed: {}", token, e))
}

fn check<T>(expected: T, value: Value) -> Result<(), TestCaseError>
where
    T: FromGraphson + PartialEq + Debug,
{
    let actual = roundtrip::<T>(value).map_err(TestCaseError::fail)?;
    prop_assert_eq!(actual, expected);
    Ok(())
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        check(n, Value::from(n))?;
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        check(n, Value::from(n))?;
    }

    #[test]
    fn prop_finite_f64(d in any::<f64>().prop_filter("finite", |d| d.is_finite())) {
        check(d, Value::from(d))?;
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        check(b, Value::from(b))?;
    }

    #[test]
    fn prop_string(s in ".*") {
        check(s.clone(), Value::from(s))?;
    }

    #[test]
    fn prop_vec_i64(v in prop::collection::vec(any::<i64>(), 0..20)) {
        check(v.clone(), Value::from(v))?;
    }

    #[test]
    fn prop_vec_string(v in prop::collection::vec("[a-z]{0,8}", 0..20)) {
        check(v.clone(), Value::from(v))?;
    }

    #[test]
    fn prop_hash_set_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        let expected: HashSet<i32> = v.iter().copied().collect();
        let set: ValueSet = v.into_iter().map(Value::from).collect();
        check(expected, Value::Set(set))?;
    }

    #[test]
    fn prop_index_map(entries in prop::collection::vec(("[a-z]{1,6}", any::<i64>()), 0..12)) {
        let expected: IndexMap<String, i64> = entries.into_iter().collect();
        let map: ValueMap = expected
            .iter()
            .map(|(k, v)| (Value::from(k.as_str()), Value::from(*v)))
            .collect();
        check(expected, Value::Map(map))?;
    }

    #[test]
    fn prop_int_keyed_map(entries in prop::collection::btree_map(any::<i32>(), any::<bool>(), 0..12)) {
        let map: ValueMap = entries
            .iter()
            .map(|(k, v)| (Value::from(*k), Value::from(*v)))
            .collect();
        check::<BTreeMap<i32, bool>>(entries, Value::Map(map))?;
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        check(opt, Value::from(opt))?;
    }

    #[test]
    fn prop_bulk_set_expansion(counts in prop::collection::vec(("[a-d]", 0i64..5), 0..6)) {
        let engine = engine();
        let mut payload = Vec::new();
        let mut expected = Vec::new();
        for (element, count) in &counts {
            payload.push(serde_json::json!(element));
            payload.push(serde_json::json!(count));
            for _ in 0..*count {
                expected.push(element.clone());
            }
        }
        let token = graphson_codec::wire::tagged("g:BulkSet", serde_json::Value::Array(payload));
        let decoded: Result<Vec<String>, _> = engine.decode_as(&token);
        // duplicate elements are legal in an expansion; only a map target rejects them
        prop_assert_eq!(decoded.map_err(|e| TestCaseError::fail(e.to_string()))?, expected);
    }
}
