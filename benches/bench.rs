//! Criterion benchmarks for Glaive.
//!
//! Covers the three hot paths of a documentation search index:
//! - Running text through the English pipeline
//! - Building an index from a batch of sections
//! - Answering queries, with and without prefix expansion

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use glaive::analysis::pipeline::Pipeline;
use glaive::index::{Document, IndexConfig, SearchIndexFile, build};
use glaive::search::{CombineWith, SearchOptions, search};
use std::hint::black_box;

/// Generate documentation-like sections for benchmarking.
fn generate_test_documents(count: usize) -> Vec<Document> {
    let words = [
        "build",
        "building",
        "cache",
        "cached",
        "toolchain",
        "toolchains",
        "monorepo",
        "polyglot",
        "rules",
        "target",
        "targets",
        "dependency",
        "graph",
        "javascript",
        "remote",
        "execution",
        "workspace",
        "configuration",
        "the",
        "and",
        "with",
        "for",
        "easily",
        "efficiently",
    ];

    (0..count)
        .map(|i| {
            let body_length = 40 + (i % 80);
            let body: Vec<&str> = (0..body_length)
                .map(|j| words[(i * 7 + j * 13) % words.len()]) // Pseudo-random distribution
                .collect();
            let title = format!("{} {}", words[i % words.len()], words[(i / 3) % words.len()]);
            Document::builder()
                .url(format!("section{}.html#part-{}", i / 10, i % 10))
                .breadcrumbs(format!("Guide » Section {} » {title}", i / 10))
                .title(title)
                .body(body.join(" "))
                .build()
        })
        .collect()
}

/// Benchmark the token pipeline.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let pipeline = Pipeline::english();
    let documents = generate_test_documents(100);

    group.bench_function("terms_single_body", |b| {
        b.iter(|| black_box(pipeline.terms(black_box(documents[0].field("body")))))
    });

    group.throughput(Throughput::Elements(documents.len() as u64));
    group.bench_function("terms_batch_bodies", |b| {
        b.iter(|| {
            for document in &documents {
                black_box(pipeline.terms(black_box(document.field("body"))));
            }
        })
    });

    group.finish();
}

/// Benchmark index construction and serialization.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    for count in [100, 1000] {
        let documents = generate_test_documents(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("index", count), &documents, |b, docs| {
            b.iter(|| black_box(build(docs.clone(), IndexConfig::default()).unwrap()))
        });
    }

    let index = build(generate_test_documents(1000), IndexConfig::default())
        .unwrap()
        .index;
    let file = SearchIndexFile::new(index, SearchOptions::default());
    group.bench_function("to_javascript_1000", |b| {
        b.iter(|| black_box(file.to_javascript().unwrap()))
    });

    let text = file.to_javascript().unwrap();
    group.bench_function("parse_1000", |b| {
        b.iter(|| black_box(text.parse::<SearchIndexFile>().unwrap()))
    });

    group.finish();
}

/// Benchmark queries against a prebuilt index.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let index = build(generate_test_documents(1000), IndexConfig::default())
        .unwrap()
        .index;
    let expand = SearchOptions::default();
    let exact = SearchOptions::default().with_expand(false);
    let and = SearchOptions::default().with_combine_with(CombineWith::And);

    for query in ["cache", "build toolchain", "dep"] {
        group.bench_with_input(BenchmarkId::new("expand", query), query, |b, q| {
            b.iter(|| black_box(search(&index, black_box(q), &expand)))
        });
        group.bench_with_input(BenchmarkId::new("exact", query), query, |b, q| {
            b.iter(|| black_box(search(&index, black_box(q), &exact)))
        });
    }

    group.bench_function("and_three_terms", |b| {
        b.iter(|| black_box(search(&index, black_box("remote cached targets"), &and)))
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_build, bench_search);

criterion_main!(benches);
