//! Benchmarks for duramap store operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use duramap::{Config, DuraMap};
use tempfile::TempDir;

const ENTRIES: usize = 1_000;

/// Build a committed store with ENTRIES string values
fn seeded_store(temp: &TempDir) -> DuraMap<String> {
    let config = Config::builder()
        .path(temp.path().join("bench-store"))
        .fsync(false)
        .build();

    let mut store: DuraMap<String> = DuraMap::open_with(config).unwrap();
    for i in 0..ENTRIES {
        store.set(format!("key{:06}", i), format!("value-{}", i));
    }
    store.sync().unwrap();
    store
}

fn bench_set(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let mut store = seeded_store(&temp);
    let mut i = 0u64;

    c.bench_function("set_pending", |b| {
        b.iter(|| {
            i += 1;
            store.set(format!("hot{}", i % 64), black_box("payload".to_string()));
        })
    });
}

fn bench_get_cold_then_warm(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let mut store = seeded_store(&temp);

    c.bench_function("get_warm", |b| {
        store.fullcache().unwrap();
        b.iter(|| {
            black_box(store.get("key000500").unwrap());
        })
    });

    c.bench_function("get_cold", |b| {
        b.iter(|| {
            store.clear_cache();
            black_box(store.get("key000500").unwrap());
        })
    });
}

fn bench_sync(c: &mut Criterion) {
    c.bench_function("sync_1k_entries", |b| {
        b.iter_batched(
            || {
                let temp = TempDir::new().unwrap();
                let store = seeded_store(&temp);
                (temp, store)
            },
            |(_temp, mut store)| {
                store.set("extra", "one more".to_string());
                store.sync().unwrap();
            },
            BatchSize::PerIteration,
        )
    });
}

criterion_group!(benches, bench_set, bench_get_cold_then_warm, bench_sync);
criterion_main!(benches);
