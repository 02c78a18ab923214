use chrono::{TimeZone, Utc};
use graphson_codec::plugins::{ByteBufferPlugin, DedupCollectionPlugin};
use graphson_codec::{
    from_str, tagged, to_string, to_value, Encoded, Engine, EngineOptions, Error, LazyNode,
    Number, Result, ScalarKind, TagEncoder, Token, TypeDesc, Value, ValueKind, ValueMap,
};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Serialize)]
struct Vertex {
    id: i64,
    label: String,
    properties: HashMap<String, Vec<String>>,
}

fn vertex_token() -> Token {
    tagged!("g:Map" => [
        "id", ("g:Int64" => 1),
        "label", "person",
        "name", ("g:List" => ["marko"]),
        "age", ("g:List" => [("g:Int32" => 29)])
    ])
}

#[test]
fn test_vertex_as_opaque_map() {
    let engine = Engine::default();
    let value = engine.decode_opaque(&vertex_token()).unwrap();
    let map = value.as_map().unwrap();

    assert_eq!(map.len(), 4);
    assert_eq!(map.get_str("id"), Some(&Value::from(1i64)));
    assert_eq!(map.get_str("label"), Some(&Value::from("person")));
    assert_eq!(
        map.get_str("age"),
        Some(&Value::from(vec![Value::from(29i32)]))
    );
}

#[test]
fn test_vertex_with_lazy_properties() {
    let engine = Engine::default();
    let properties: IndexMap<String, LazyNode> = engine.decode_as(&vertex_token()).unwrap();

    let id: i64 = properties["id"].materialize_as().unwrap();
    let label: String = properties["label"].materialize_as().unwrap();
    let ages: Vec<i64> = properties["age"].materialize_as().unwrap();
    let names: BTreeSet<String> = properties["name"].materialize_as().unwrap();

    assert_eq!(id, 1);
    assert_eq!(label, "person");
    assert_eq!(ages, vec![29]);
    assert!(names.contains("marko"));
}

#[test]
fn test_result_list_of_maps() {
    let text = r#"{"@type": "g:List", "@value": [
        {"@type": "g:Map", "@value": ["name", "marko", "age", {"@type": "g:Int32", "@value": 29}]},
        {"@type": "g:Map", "@value": ["name", "vadas", "age", {"@type": "g:Int32", "@value": 27}]}
    ]}"#;
    let rows: Vec<HashMap<String, Value>> = from_str(text).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["name"], Value::from("vadas"));
    assert_eq!(rows[0]["age"], Value::from(29i32));
}

#[test]
fn test_group_count_bulk_set() {
    let engine = Engine::default();
    let token = tagged!("g:BulkSet" => ["software", ("g:Int64" => 2), "person", ("g:Int64" => 4)]);

    let counts: IndexMap<String, i64> = engine.decode_as(&token).unwrap();
    assert_eq!(counts.get_index(0), Some((&"software".to_string(), &2)));
    assert_eq!(counts["person"], 4);

    let expanded: Vec<String> = engine.decode_as(&token).unwrap();
    assert_eq!(expanded.len(), 6);
    assert_eq!(&expanded[..2], &["software", "software"]);

    let distinct: HashSet<String> = engine.decode_as(&token).unwrap();
    assert_eq!(distinct.len(), 2);
}

#[test]
fn test_encode_decode_struct() {
    let mut properties = HashMap::new();
    properties.insert("name".to_string(), vec!["marko".to_string()]);
    let vertex = Vertex {
        id: 1,
        label: "person".to_string(),
        properties,
    };

    let value = to_value(&vertex).unwrap();
    let text = to_string(&value).unwrap();
    let back: Value = from_str(&text).unwrap();
    assert_eq!(back, value);

    let map = back.as_map().unwrap();
    assert_eq!(map.get_str("id"), Some(&Value::from(1i64)));
}

#[test]
fn test_dates_and_big_integers() {
    let engine = Engine::default();
    let date = Utc.timestamp_millis_opt(1_481_750_076_295).unwrap();
    let big = BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();

    let mut map = ValueMap::new();
    map.insert(Value::from("created"), Value::from(date));
    map.insert(Value::from("weight"), Value::BigInt(big.clone()));
    let token = engine.encode(&Value::Map(map)).unwrap();

    assert_eq!(
        token,
        json!({"@type": "g:Map", "@value": [
            "created", {"@type": "g:Date", "@value": 1_481_750_076_295i64},
            "weight", {"@type": "gx:BigInteger", "@value": "123456789012345678901234567890"}
        ]})
    );

    let decoded: IndexMap<String, Value> = engine.decode_as(&token).unwrap();
    assert_eq!(decoded["created"], Value::Date(date));
    assert_eq!(decoded["weight"], Value::BigInt(big));
}

#[test]
fn test_timestamp_decodes_as_date() {
    let engine = Engine::default();
    let when: chrono::DateTime<Utc> = engine
        .decode_as(&tagged!("g:Timestamp" => 0))
        .unwrap();
    assert_eq!(when.timestamp_millis(), 0);
}

#[test]
fn test_special_doubles() {
    let engine = Engine::default();
    let nan: f64 = engine.decode_as(&tagged!("g:Double" => "NaN")).unwrap();
    assert!(nan.is_nan());
    let inf: f64 = engine.decode_as(&tagged!("g:Double" => "-Infinity")).unwrap();
    assert_eq!(inf, f64::NEG_INFINITY);

    let encoded = engine.encode(&Value::from(f64::INFINITY)).unwrap();
    assert_eq!(encoded, tagged!("g:Double" => "Infinity"));
}

#[test]
fn test_byte_buffer() {
    let engine = Engine::default();
    let token = tagged!("gx:ByteBuffer" => "AAEC");
    let value = engine.decode(&token, &TypeDesc::Scalar(ScalarKind::Bytes)).unwrap();
    assert_eq!(value.as_bytes(), Some(&[0u8, 1, 2][..]));
    assert_eq!(engine.encode(&value).unwrap(), token);

    let err = engine.decode_opaque(&tagged!("gx:ByteBuffer" => "%%%")).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
}

#[test]
fn test_bare_engine_with_single_plugin() {
    let engine = Engine::new(
        EngineOptions::bare()
            .with_decoder("gx:ByteBuffer", ByteBufferPlugin)
            .with_encoder(ValueKind::Bytes, ByteBufferPlugin),
    );

    // no g:Int32 decoder in a bare engine
    let err = engine.decode_opaque(&tagged!("g:Int32" => 1)).unwrap_err();
    assert!(err.to_string().contains("g:Int32"));

    // built-in composites still work
    let list = engine.decode_opaque(&tagged!("g:List" => [1, 2])).unwrap();
    assert_eq!(list, Value::from(vec![1i64, 2]));

    assert_eq!(
        engine.encode(&Value::Bytes(vec![0xff])).unwrap(),
        tagged!("gx:ByteBuffer" => "/w==")
    );
}

#[test]
fn test_custom_dedup_tag() {
    let engine = Engine::new(
        EngineOptions::new()
            .with_decoder("custom:Labels", DedupCollectionPlugin::new("custom:Labels")),
    );
    let labels: Vec<String> = engine
        .decode_as(&tagged!("custom:Labels" => ["a", "b", "a"]))
        .unwrap();
    assert_eq!(labels, vec!["a", "b"]);

    let empty = engine
        .decode_opaque(&tagged!("custom:Labels" => "not a list"))
        .unwrap();
    assert_eq!(empty.as_set().map(|s| s.len()), Some(0));
}

#[test]
fn test_plugin_wrapping_children_in_lazy_nodes() {
    // A vertex decoder that leaves every property undecoded until asked for.
    fn vertex(payload: &Token, engine: &Engine) -> Result<Value> {
        let fields = payload
            .as_object()
            .ok_or_else(|| Error::malformed("demo:Vertex payload must be an object"))?;
        let mut map = ValueMap::with_capacity(fields.len());
        for (key, value) in fields {
            map.insert(Value::from(key.as_str()), engine.decode(value, &TypeDesc::Lazy)?);
        }
        Ok(Value::Map(map))
    }

    let engine = Engine::new(EngineOptions::new().with_decoder("demo:Vertex", vertex));
    let token = tagged!("demo:Vertex" => {
        "id": {"@type": "g:Int64", "@value": 10},
        "tags": {"@type": "g:Set", "@value": ["x", "x"]}
    });

    let value = engine.decode_opaque(&token).unwrap();
    let map = value.as_map().unwrap();
    assert!(map.values().all(Value::is_node));

    let tags = map.get_str("tags").and_then(Value::as_node).unwrap();
    let distinct: BTreeSet<String> = tags.materialize_as().unwrap();
    assert_eq!(distinct.len(), 1);
    // list targets keep the payload as sent
    let as_list: Vec<String> = tags.materialize_as().unwrap();
    assert_eq!(as_list, vec!["x", "x"]);
    let id = map.get_str("id").and_then(Value::as_node).unwrap();
    assert_eq!(id.materialize_as::<i32>().unwrap(), 10);
}

#[test]
fn test_custom_encoder_for_strings() {
    struct Upper;

    impl TagEncoder for Upper {
        fn tag(&self) -> &str {
            "demo:Upper"
        }

        fn encode_tag(&self, value: &Value, _: &Engine) -> Result<Encoded> {
            let text = value.as_str().unwrap_or_default().to_uppercase();
            Ok(Encoded::Payload(Token::from(text)))
        }
    }

    let engine = Engine::new(EngineOptions::new().with_encoder(ValueKind::String, Upper));
    let token = engine.encode(&Value::from(vec!["a"])).unwrap();
    assert_eq!(
        token,
        tagged!("g:List" => [("demo:Upper" => "A")])
    );
}

#[test]
fn test_conversion_errors_name_both_sides() {
    let engine = Engine::default();
    // Int32 -> Date is in the standard catalog
    assert!(engine
        .decode(&tagged!("g:Int32" => 1), &TypeDesc::Scalar(ScalarKind::Date))
        .is_ok());

    let err = engine
        .decode(&json!(true), &TypeDesc::Scalar(ScalarKind::Date))
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot convert Bool to Date");
}

#[test]
fn test_numbers_keep_their_width() {
    let engine = Engine::default();
    for value in [
        Value::from(1i32),
        Value::from(1i64),
        Value::from(1.5f32),
        Value::from(1.5f64),
    ] {
        let token = engine.encode(&value).unwrap();
        assert_eq!(engine.decode_opaque(&token).unwrap(), value);
    }
    assert_eq!(
        Value::Number(Number::Float(1.5)).kind(),
        ValueKind::Float
    );
}
