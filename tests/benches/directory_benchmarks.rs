//! # Tollgate Directory Benchmarks
//!
//! | Operation | Shape | Target |
//! |-----------|-------|--------|
//! | `append` | indexed insert | < 10µs per row |
//! | `query` | filter + single order | < 1ms at 10k rows |
//! | `query` | two-key order | < 5ms at 10k rows |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;
use tg_01_directory_store::{Direction, DirectoryStore, Filters, Orders, Row};

const REGIONS: [&str; 4] = ["eu", "us", "ap", "sa"];

fn random_row(rng: &mut impl Rng, i: usize) -> Row {
    Row::new()
        .with("name", format!("node-{}", i).as_str())
        .with("region", REGIONS[rng.gen_range(0..REGIONS.len())])
        .with("load", rng.gen_range(0i64..1_000))
        .with("price", rng.gen_range(0i64..1_000_000))
}

fn populated(size: usize) -> DirectoryStore {
    let mut rng = rand::thread_rng();
    let mut store = DirectoryStore::new();
    for i in 0..size {
        store.append(random_row(&mut rng, i));
    }
    store
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("tg-01-directory-append");
    group.measurement_time(Duration::from_secs(5));

    for size in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("append", size), &size, |b, &size| {
            b.iter(|| black_box(populated(size)))
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("tg-01-directory-query");
    group.measurement_time(Duration::from_secs(5));

    for size in [1_000, 10_000] {
        let store = populated(size);

        let filtered = (
            Orders::new().then("load", Direction::Ascending),
            Filters::new().with("region", "eu"),
        );
        group.bench_with_input(BenchmarkId::new("filter_order", size), &size, |b, _| {
            b.iter(|| black_box(store.query(&filtered.0, &filtered.1).len()))
        });

        let two_keys = (
            Orders::new()
                .then("load", Direction::Ascending)
                .then("price", Direction::Descending),
            Filters::new(),
        );
        group.bench_with_input(BenchmarkId::new("two_key_order", size), &size, |b, _| {
            b.iter(|| black_box(store.query(&two_keys.0, &two_keys.1).len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append, bench_query);
criterion_main!(benches);
