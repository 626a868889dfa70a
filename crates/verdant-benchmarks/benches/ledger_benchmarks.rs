//! Ledger Benchmarks for Verdant
//!
//! Generation / tokenization commit cost on the in-memory store.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use verdant_benchmarks::credits;
use verdant_credits::{ProjectId, TokenizationLedger};

fn ledger_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");

    let ledger = TokenizationLedger::new();
    let project = ProjectId::from("bench-solar");

    group.bench_function("generate_then_tokenize", |b| {
        b.iter(|| {
            ledger.record_generation(&project, credits(1_000)).ok();
            ledger.record_tokenization(black_box(&project), credits(1_000)).ok()
        })
    });

    group.bench_function("available_to_tokenize", |b| {
        b.iter(|| ledger.available_to_tokenize(black_box(&project)))
    });

    group.finish();
}

criterion_group!(benches, ledger_benchmarks);
criterion_main!(benches);
