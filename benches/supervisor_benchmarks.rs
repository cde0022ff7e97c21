//! Supervision Benchmarks
//!
//! Measures baseline performance of supervision operations:
//! - Child registration under a supervisor group
//! - Restart strategies comparison (OneForOne, OneForAll, RestForOne)
//! - Failure handling on a small supervision group

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use silo_rt::supervisor::{ChildSpec, OneForAll, OneForOne, RestForOne, Supervisor, SupervisorTree};
use silo_rt::util::{ActorKey, ChildId, TypeId};

fn parent() -> ActorKey {
    ActorKey::new(TypeId::new("Manager"), "bench-parent")
}

fn child(n: usize) -> ChildId {
    ChildId::new(ActorKey::new(TypeId::new("Worker"), format!("child-{n}")))
}

/// Benchmark: registering a single child under a supervisor group.
fn supervisor_child_register(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("failed to create runtime");

    c.bench_function("supervisor_child_register", |b| {
        b.to_async(&rt).iter(|| async {
            let tree = SupervisorTree::<OneForOne>::new("bench");
            tree.register_child(parent(), ChildSpec::new(child(1))).await;
            black_box(&tree);
        });
    });
}

/// Benchmark: compare restart strategies under a single-child failure.
fn supervisor_restart_strategy(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("failed to create runtime");

    c.bench_function("supervisor_strategy_one_for_one", |b| {
        b.to_async(&rt).iter(|| async {
            let tree = SupervisorTree::<OneForOne>::new("bench");
            tree.register_child(parent(), ChildSpec::new(child(1))).await;

            let decision = tree
                .handle_child_failure(&parent(), child(1), "bench failure".into())
                .await
                .expect("failure should be handled");
            black_box(decision);
        });
    });

    c.bench_function("supervisor_strategy_one_for_all", |b| {
        b.to_async(&rt).iter(|| async {
            let tree = SupervisorTree::<OneForAll>::new("bench");
            for n in 1..=3 {
                tree.register_child(parent(), ChildSpec::new(child(n))).await;
            }

            let decision = tree
                .handle_child_failure(&parent(), child(1), "bench failure".into())
                .await
                .expect("failure should be handled");
            black_box(decision);
        });
    });

    c.bench_function("supervisor_strategy_rest_for_one", |b| {
        b.to_async(&rt).iter(|| async {
            let tree = SupervisorTree::<RestForOne>::new("bench");
            for n in 1..=3 {
                tree.register_child(parent(), ChildSpec::new(child(n))).await;
            }

            let decision = tree
                .handle_child_failure(&parent(), child(2), "bench failure".into())
                .await
                .expect("failure should be handled");
            black_box(decision);
        });
    });
}

/// Benchmark: small supervision group operations (register three, fail one).
fn supervision_tree_small(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("supervision_tree_small", |b| {
        b.to_async(&rt).iter(|| async {
            let tree = SupervisorTree::<OneForOne>::new("bench");
            for n in 1..=3 {
                tree.register_child(parent(), ChildSpec::new(child(n))).await;
            }

            let decision = tree
                .handle_child_failure(&parent(), child(3), "bench failure".into())
                .await
                .unwrap();

            black_box(decision);
        });
    });
}

/// Configure criterion for resource-conscious benchmarking
fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        supervisor_child_register,
        supervisor_restart_strategy,
        supervision_tree_small
}

criterion_main!(benches);
