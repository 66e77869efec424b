// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Benchmarks for filter expression parsing and rendering.

#![allow(clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filterq::{parse, parse_str, ParserConfig};

fn filter_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_parsing");

    let inputs = [
        ("single", "age >= 21"),
        ("string", "name == \"bob smith\""),
        ("connectors", "a == 1 && b != 2 || c < 3 && d >= 4.5"),
        ("grouped", "(a == 1 && (b == 2 || c == 3)) || (d > 4 && e < 5)"),
        ("function", "name.substr(0, 3) == \"bob\" && tags.len() > 2"),
    ];

    for (name, input) in inputs {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), input, |b, i| {
            b.iter(|| parse(i.as_bytes()))
        });
    }
    group.finish();
}

fn filter_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_scaling");
    let config = ParserConfig::default()
        .with_max_clauses(1000)
        .expect("valid limits");

    for clauses in [1usize, 10, 100, 1000] {
        let input = (0..clauses)
            .map(|i| format!("k == {i}"))
            .collect::<Vec<_>>()
            .join(" && ");
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("flat_and", clauses),
            &input,
            |b, i| b.iter(|| config.parse(i.as_bytes())),
        );
    }
    group.finish();
}

fn filter_rendering(c: &mut Criterion) {
    let query = parse_str("(a == 1 && b == \"x\") || c.len() > 2.5").expect("valid filter");
    c.bench_function("render_canonical", |b| b.iter(|| query.to_string()));
}

criterion_group!(benches, filter_parsing, filter_scaling, filter_rendering);
criterion_main!(benches);
