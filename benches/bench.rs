//! Criterion benchmarks for Bitsearch.
//!
//! Covers the hot paths of query evaluation:
//! - Bitset set operations and the flat array form
//! - Field analysis pipelines
//! - Boolean search over an in-memory index

use std::hint::black_box;
use std::sync::Arc;

use bitsearch::analysis::FieldType;
use bitsearch::bitset::BitSet;
use bitsearch::indexer::IndexerBuilder;
use bitsearch::query::{Query, QueryBuilder};
use bitsearch::search::SearcherBuilder;
use bitsearch::storage::{KeyValueStore, MemoryStore};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    let words = [
        "search", "engine", "index", "query", "document", "field", "term", "boolean", "posting",
        "bitset", "boost", "facet", "highlight", "suggest", "soundex", "storage", "retrieval",
        "ranking", "filtering", "pipeline",
    ];

    (0..count)
        .map(|i| {
            let doc_length = 10 + (i % 40);
            (0..doc_length)
                .map(|j| words[(i * 7 + j * 13) % words.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// A bitset holding every `step`-th id below `limit`.
fn strided(step: u32, limit: u32) -> BitSet {
    (0..limit).step_by(step as usize).collect()
}

fn bench_bitset(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitset");

    let a = strided(3, 100_000);
    let b = strided(5, 100_000);

    group.bench_function("and", |bench| {
        bench.iter(|| {
            let mut result = a.clone();
            result.and(black_box(&b));
            black_box(result)
        })
    });

    group.bench_function("or", |bench| {
        bench.iter(|| {
            let mut result = a.clone();
            result.or(black_box(&b));
            black_box(result)
        })
    });

    group.bench_function("and_not", |bench| {
        bench.iter(|| {
            let mut result = a.clone();
            result.and_not(black_box(&b));
            black_box(result)
        })
    });

    group.throughput(Throughput::Elements(a.len() as u64));
    group.bench_function("iterate", |bench| {
        bench.iter(|| black_box(a.iter().count()))
    });

    let encoded = serde_json::to_string(&a).unwrap_or_default();
    group.bench_function("json_roundtrip", |bench| {
        bench.iter(|| {
            let decoded: BitSet = serde_json::from_str(black_box(&encoded)).unwrap();
            black_box(decoded)
        })
    });

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    let texts = generate_test_documents(100);

    for field_type in [FieldType::Text, FieldType::Soundex, FieldType::Suggest] {
        let pipeline = field_type.pipeline();
        group.throughput(Throughput::Elements(texts.len() as u64));
        group.bench_function(format!("analyze_{}", field_type.name().to_lowercase()), |b| {
            b.iter(|| {
                for text in &texts {
                    let _ = black_box(pipeline.analyze(black_box(text)));
                }
            })
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let searcher = runtime.block_on(async {
        store.open().await.unwrap();
        let indexer = IndexerBuilder::new().storage(store.clone()).build().unwrap();
        for (i, text) in generate_test_documents(500).into_iter().enumerate() {
            let document = json!({"body": text, "n": i % 10});
            indexer
                .add_document(document.as_object().unwrap())
                .await
                .unwrap();
        }
        SearcherBuilder::new()
            .storage(store.clone())
            .schema(indexer.schema())
            .build()
            .unwrap()
    });

    let boolean = QueryBuilder::new()
        .and()
        .term("body", "bitset")
        .or()
        .term("n", 1)
        .term("n", 2)
        .end()
        .not()
        .term("body", "soundex")
        .end()
        .build();

    group.bench_function("boolean_query", |b| {
        b.iter(|| runtime.block_on(searcher.search(black_box(&boolean))))
    });

    let facets = Query::all().with_facets(["n"]).with_paging(0, 0);
    group.bench_function("facets_over_all", |b| {
        b.iter(|| runtime.block_on(searcher.search(black_box(&facets))))
    });

    group.finish();
}

criterion_group!(benches, bench_bitset, bench_analysis, bench_search);

criterion_main!(benches);
