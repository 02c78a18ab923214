use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graphson_codec::{tagged, Engine, LazyNode, Token, TypeDesc, Value, ValueMap};
use indexmap::IndexMap;
use std::collections::HashSet;

fn vertex(i: i64) -> Token {
    tagged!("g:Map" => [
        "id", ("g:Int64" => i),
        "label", "person",
        "name", ("g:List" => [(format!("person-{}", i))]),
        "age", ("g:List" => [("g:Int32" => (i % 90))])
    ])
}

fn result_list(size: i64) -> Token {
    Token::Array((0..size).map(vertex).collect())
}

fn benchmark_decode_scalar(c: &mut Criterion) {
    let engine = Engine::default();
    let token = tagged!("g:Int64" => 42);

    c.bench_function("decode_tagged_int64", |b| {
        b.iter(|| engine.decode_as::<i64>(black_box(&token)))
    });

    c.bench_function("decode_tagged_int64_as_string", |b| {
        b.iter(|| engine.decode_as::<String>(black_box(&token)))
    });
}

fn benchmark_decode_results(c: &mut Criterion) {
    let engine = Engine::default();
    let mut group = c.benchmark_group("decode_results");

    for size in [10, 100, 500].iter() {
        let token = result_list(*size);

        group.bench_with_input(BenchmarkId::new("opaque", size), &token, |b, token| {
            b.iter(|| engine.decode_opaque(black_box(token)))
        });

        group.bench_with_input(BenchmarkId::new("lazy", size), &token, |b, token| {
            b.iter(|| engine.decode_as::<Vec<IndexMap<String, LazyNode>>>(black_box(token)))
        });
    }
    group.finish();
}

fn benchmark_decode_sets(c: &mut Criterion) {
    let engine = Engine::default();
    let mut group = c.benchmark_group("decode_sets");

    for size in [10, 100, 1000].iter() {
        let items: Vec<Token> = (0..*size).map(|i| Token::from(i % 10)).collect();
        let set = tagged!("g:Set" => (Token::Array(items.clone())));
        let mut flattened = Vec::new();
        for i in 0..*size {
            flattened.push(Token::from(format!("e{}", i)));
            flattened.push(Token::from(3));
        }
        let bulk = graphson_codec::wire::tagged("g:BulkSet", Token::Array(flattened));

        group.bench_with_input(BenchmarkId::new("set", size), &set, |b, token| {
            b.iter(|| engine.decode_as::<HashSet<i64>>(black_box(token)))
        });

        group.bench_with_input(BenchmarkId::new("bulk_set", size), &bulk, |b, token| {
            b.iter(|| engine.decode_as::<Vec<String>>(black_box(token)))
        });
    }
    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let engine = Engine::default();
    let mut group = c.benchmark_group("encode");

    for size in [10, 100, 500].iter() {
        let rows: Vec<Value> = (0..*size)
            .map(|i: i64| {
                let mut map = ValueMap::new();
                map.insert(Value::from("id"), Value::from(i));
                map.insert(Value::from("name"), Value::from(format!("person-{}", i)));
                map.insert(Value::from("weight"), Value::from(i as f64 * 0.5));
                Value::Map(map)
            })
            .collect();
        let value = Value::List(rows);

        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| engine.encode(black_box(value)))
        });
    }
    group.finish();
}

fn benchmark_lazy_materialize(c: &mut Criterion) {
    let engine = Engine::default();
    let node: LazyNode = engine
        .decode_as(&result_list(100))
        .expect("lazy decode never fails");

    c.bench_function("materialize_100_vertices", |b| {
        b.iter(|| black_box(&node).materialize(&TypeDesc::Object))
    });
}

criterion_group!(
    benches,
    benchmark_decode_scalar,
    benchmark_decode_results,
    benchmark_decode_sets,
    benchmark_encode,
    benchmark_lazy_materialize
);
criterion_main!(benches);
