use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::HashMap;
use std::hint::black_box;
use seqweld::prelude::*;

fn bench_basic_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic_pipeline");

    for size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("noop", size), size, |b, &size| {
            let source = from_iter(0..size);
            b.iter(|| black_box((&source).count()));
        });

        group.bench_with_input(BenchmarkId::new("map", size), size, |b, &size| {
            let source = from_iter(0..size).map(|x: i64| black_box(x * 2));
            b.iter(|| black_box((&source).sum()));
        });
    }

    group.finish();
}

fn bench_combinators(c: &mut Criterion) {
    let mut group = c.benchmark_group("combinators");

    group.bench_function("filter_map_take", |b| {
        let pipeline = from_iter(0..10000i64)
            .filter(|x| x % 2 == 0)
            .map(|x| black_box(x * 3))
            .take(1000);
        b.iter(|| black_box((&pipeline).to_vec()));
    });

    group.bench_function("distinct", |b| {
        let pipeline = from_iter((0..10000i64).map(|x| x % 97)).distinct();
        b.iter(|| black_box((&pipeline).count()));
    });

    group.bench_function("intersection", |b| {
        let pipeline = from_iter(0..10000i64).intersection(from_iter((0..10000i64).step_by(7)));
        b.iter(|| black_box((&pipeline).count()));
    });

    group.finish();
}

fn bench_stores(c: &mut Criterion) {
    let mut group = c.benchmark_group("stores");

    for size in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        let store: SyncMap<u64, u64> = (0..*size).map(|n| (n, n)).collect();
        group.bench_with_input(BenchmarkId::new("sync_values_sum", size), size, |b, _| {
            b.iter(|| black_box(sync_values(&store).sum()));
        });

        let map: HashMap<u64, u64> = (0..*size).map(|n| (n, n)).collect();
        let keys: Vec<u64> = (0..*size).step_by(3).collect();
        group.bench_with_input(BenchmarkId::new("get_all_by_keys", size), size, |b, _| {
            let found = get_all_by_keys(&map, keys.iter().copied());
            b.iter(|| black_box((&found).values().sum()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_basic_pipeline, bench_combinators, bench_stores);
criterion_main!(benches);
