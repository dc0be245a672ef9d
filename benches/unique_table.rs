//! Unique-table benchmarks.
//!
//! Measures get-or-create throughput on misses and hits, and the cost of a
//! reset that keeps part of the table.
//!
//! Run with:
//! ```bash
//! cargo bench --bench unique_table
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tdd_rs::node::{Edge, Successors};
use tdd_rs::reference::NodeRef;
use tdd_rs::store::{LocalStore, SharedStore};
use tdd_rs::types::Order;

/// Build a complete binary tree of distinct leaves and shared inner levels.
fn build(store: &SharedStore<f64>, depth: u32, width: usize) -> Vec<NodeRef> {
    (0..width)
        .map(|i| {
            let mut current = store.get_unique_node(
                Order::new(depth),
                Successors::from_iter([Edge::terminal(i as f64), Edge::terminal(1.0)]),
            );
            for order in (0..depth).rev() {
                current = store.get_unique_node(
                    Order::new(order),
                    Successors::from_iter([Edge::to(0.5, current), Edge::terminal(0.5)]),
                );
            }
            current
        })
        .collect()
}

fn bench_get_unique_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique/get_unique_node");

    for width in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("miss/shared", width), &width, |b, &width| {
            b.iter(|| {
                let store = SharedStore::<f64>::new();
                black_box(build(&store, 8, width))
            });
        });

        group.bench_with_input(BenchmarkId::new("hit/shared", width), &width, |b, &width| {
            let store = SharedStore::<f64>::new();
            build(&store, 8, width);
            b.iter(|| black_box(build(&store, 8, width)));
        });
    }

    group.bench_function("hit/local", |b| {
        let store = LocalStore::<f64>::new();
        let succ = Successors::from_iter([Edge::terminal(1.0), Edge::terminal(0.5)]);
        store.get_unique_node_by_ref(Order::new(0), &succ);
        b.iter(|| black_box(store.get_unique_node_by_ref(Order::new(0), &succ)));
    });

    group.finish();
}

fn bench_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique/reset");
    group.sample_size(20);

    for width in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("keep_half", width), &width, |b, &width| {
            b.iter_batched(
                || {
                    let store = SharedStore::<f64>::new();
                    let roots = build(&store, 8, width);
                    (store, roots)
                },
                |(mut store, roots)| {
                    let kept = store.reset(&roots[..width / 2]);
                    black_box((store, kept))
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get_unique_node, bench_reset);
criterion_main!(benches);
