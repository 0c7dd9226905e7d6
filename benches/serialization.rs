use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_scl::{dumps, from_str, loads, to_string, tokenize};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct Catalog {
    products: Vec<Product>,
}

#[derive(Serialize, Deserialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
    notes: String,
}

#[derive(Serialize, Deserialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn catalog(size: u32) -> Catalog {
    Catalog {
        products: (0..size)
            .map(|i| Product {
                sku: format!("SKU{}", i),
                name: format!("Product {}", i),
                price: 9.99 + f64::from(i),
                quantity: i,
            })
            .collect(),
    }
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let text = r#"
        id :: num { 123 }
        name :: str { "Alice" }
        email :: str { "alice@example.com" }
        active :: bool { true }
    "#;

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(text)))
    });
}

fn benchmark_serialize_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_list");

    for size in [10, 50, 100, 500].iter() {
        let data = catalog(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&data)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_list");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&catalog(*size)).unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_str::<Catalog>(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_document_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");
    let text = to_string(&catalog(100)).unwrap_or_default();
    let doc = loads(&text).unwrap_or_default();

    group.bench_function("tokenize", |b| b.iter(|| tokenize(black_box(&text))));
    group.bench_function("loads", |b| b.iter(|| loads(black_box(&text))));
    group.bench_function("dumps", |b| b.iter(|| dumps(black_box(&doc))));
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let data = NestedData {
        id: 1,
        metadata: Metadata {
            created: "2024-01-01".to_string(),
            updated: "2024-01-02".to_string(),
            version: 1,
        },
        tags: vec!["tag1".to_string(), "tag2".to_string(), "tag3".to_string()],
        notes: "first line\nsecond line\nthird line".to_string(),
    };

    c.bench_function("serialize_nested", |b| b.iter(|| to_string(black_box(&data))));

    let text = to_string(&data).unwrap_or_default();
    c.bench_function("deserialize_nested", |b| {
        b.iter(|| from_str::<NestedData>(black_box(&text)))
    });
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_list,
    benchmark_deserialize_list,
    benchmark_document_roundtrip,
    benchmark_nested
);
criterion_main!(benches);
