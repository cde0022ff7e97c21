//! Consistent hash ring benchmarks.
//!
//! Measures placement lookup throughput and membership-churn rebuild cost.

#![allow(clippy::unwrap_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

// Layer 3: Internal module imports
use silo_rt::ring::ConsistentHashRing;
use silo_rt::util::SiloId;

fn ring_with_silos(count: usize) -> ConsistentHashRing {
    let ring = ConsistentHashRing::new(150);
    for i in 0..count {
        ring.insert(SiloId::new(format!("silo-{i}")));
    }
    ring
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_lookup");
    for silo_count in [1usize, 8, 64] {
        let ring = ring_with_silos(silo_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(silo_count),
            &silo_count,
            |b, _| {
                let mut i = 0u64;
                b.iter(|| {
                    i += 1;
                    black_box(ring.lookup(&format!("Counter:c{i}")));
                });
            },
        );
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("ring_insert_single_silo", |b| {
        b.iter(|| {
            let ring = ConsistentHashRing::new(150);
            ring.insert(SiloId::new("silo-A"));
            black_box(&ring);
        });
    });

    c.bench_function("ring_insert_into_64_silos", |b| {
        b.iter(|| {
            let ring = ring_with_silos(64);
            ring.insert(SiloId::new("silo-new"));
            black_box(&ring);
        });
    });
}

fn bench_remove(c: &mut Criterion) {
    c.bench_function("ring_remove_from_64_silos", |b| {
        b.iter(|| {
            let ring = ring_with_silos(64);
            ring.remove(&SiloId::new("silo-32"));
            black_box(&ring);
        });
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_lookup, bench_insert, bench_remove
}

criterion_main!(benches);
