//! Benchmarks for vector distance calculations.
//!
//! Run with: `cargo bench -p engram-index`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engram_index::distance::{cosine_distance, dot_product, l2_norm};
use rand::Rng;

/// Generate a random vector of the specified dimension.
fn random_vector(dim: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Benchmark cosine distance across common embedding dimensions.
fn bench_cosine_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_distance");

    for dim in [128, 384, 768, 1536, 3072] {
        let a = random_vector(dim);
        let b = random_vector(dim);

        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| cosine_distance(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

/// Benchmark the dot product primitive.
fn bench_dot_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_product");

    for dim in [128, 768, 3072] {
        let a = random_vector(dim);
        let b = random_vector(dim);

        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| dot_product(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

/// Benchmark the L2 norm primitive.
fn bench_l2_norm(c: &mut Criterion) {
    let mut group = c.benchmark_group("l2_norm");

    for dim in [128, 768, 3072] {
        let a = random_vector(dim);

        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| l2_norm(black_box(&a)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cosine_distance, bench_dot_product, bench_l2_norm);
criterion_main!(benches);
