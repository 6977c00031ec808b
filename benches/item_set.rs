use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use feedkit::domain::collections::ItemSet;
use feedkit::test_helpers::{message, TestMessage};

fn extend_back(c: &mut Criterion) {
    let items: Vec<TestMessage> = (0..10_000)
        .map(|i| message(&format!("m{i}"), i as i64))
        .collect();

    c.bench_function("extend-back-10k", |b| {
        b.iter(|| {
            let mut set = ItemSet::with_capacity(items.len());
            let appended = set.extend_back(black_box(items.clone()));
            black_box(appended)
        })
    });
}

fn merge_front(c: &mut Criterion) {
    let seed: Vec<TestMessage> = (0..5_000)
        .map(|i| message(&format!("m{i}"), i as i64))
        .collect();
    // Half the batch overlaps what is already in the set
    let batch: Vec<TestMessage> = (2_500..7_500)
        .map(|i| message(&format!("m{i}"), i as i64))
        .collect();

    c.bench_function("merge-front-half-overlap", |b| {
        b.iter(|| {
            let mut set: ItemSet<TestMessage> = seed.iter().cloned().collect();
            let merged = set.merge_front(black_box(batch.clone()));
            black_box(merged)
        })
    });
}

criterion_group!(benches, extend_back, merge_front);
criterion_main!(benches);
