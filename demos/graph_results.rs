//! Decoding and encoding typical graph query results.
//!
//! Run with: cargo run --example graph_results

use graphson_codec::plugins::DedupCollectionPlugin;
use graphson_codec::{
    tagged, to_value, ConverterRegistry, Engine, EngineOptions, LazyNode, ScalarKind, Token,
    TypeDesc, Value, ValueKind, ValueMap,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;

#[derive(Serialize)]
struct Edge {
    id: i64,
    label: String,
    weight: f64,
}

fn vertex(payload: &Token, engine: &Engine) -> graphson_codec::Result<Value> {
    let fields = payload
        .as_object()
        .ok_or_else(|| graphson_codec::Error::malformed("demo:Vertex payload must be an object"))?;
    let mut map = ValueMap::with_capacity(fields.len());
    for (key, value) in fields {
        map.insert(Value::from(key.as_str()), engine.decode(value, &TypeDesc::Lazy)?);
    }
    Ok(Value::Map(map))
}

fn main() -> Result<(), Box<dyn Error>> {
    let engine = Engine::default();

    // Typed decoding of a valueMap() style result
    let row = tagged!("g:Map" => [
        "name", ("g:List" => ["marko"]),
        "age", ("g:List" => [("g:Int32" => 29)])
    ]);
    let properties: IndexMap<String, Vec<Value>> = engine.decode_as(&row)?;
    println!("valueMap: {:?}\n", properties);

    // groupCount() answers come back as a BulkSet
    let counts = tagged!("g:BulkSet" => ["person", ("g:Int64" => 4), "software", ("g:Int64" => 2)]);
    let by_label: IndexMap<String, i64> = engine.decode_as(&counts)?;
    let expanded: Vec<String> = engine.decode_as(&counts)?;
    println!("counts: {:?}", by_label);
    println!("expanded: {:?}\n", expanded);

    // Defer a subtree until its type is known
    let node: LazyNode = engine.decode_as(&row)?;
    let as_text: IndexMap<String, BTreeSet<String>> = node.materialize_as()?;
    println!("lazy token: {}", node.token());
    println!("as string sets: {:?}\n", as_text);

    // A custom tag with its own decoder plus a dedup tag
    let custom = Engine::new(
        EngineOptions::new()
            .with_decoder("demo:Vertex", vertex)
            .with_decoder("demo:Labels", DedupCollectionPlugin::new("demo:Labels")),
    );
    let token = tagged!("demo:Vertex" => {
        "id": {"@type": "g:Int64", "@value": 1},
        "labels": {"@type": "demo:Labels", "@value": ["a", "b", "a"]}
    });
    let value = custom.decode_opaque(&token)?;
    if let Some(labels) = value
        .as_map()
        .and_then(|map| map.get_str("labels"))
        .and_then(Value::as_node)
    {
        let labels: Vec<String> = labels.materialize_as()?;
        println!("vertex labels: {:?}\n", labels);
    }

    // Converters bridge scalar mismatches
    let lenient = Engine::new(
        EngineOptions::new().with_converters(
            ConverterRegistry::builder()
                .with_standard()
                .register(ValueKind::Bool, ScalarKind::Int32, |value: Value| {
                    Ok(Value::from(i32::from(value.as_bool().unwrap_or_default())))
                })
                .build(),
        ),
    );
    let flag = lenient.decode(&Token::Bool(true), &TypeDesc::Scalar(ScalarKind::Int32))?;
    println!("true as Int32: {}\n", flag);

    // Encoding host values
    let edge = Edge {
        id: 7,
        label: "knows".to_string(),
        weight: 0.5,
    };
    let encoded = engine.encode(&to_value(&edge)?)?;
    println!("encoded edge: {}", serde_json::to_string_pretty(&encoded)?);

    Ok(())
}
