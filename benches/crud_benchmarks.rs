use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;
use std::ops::ControlFlow;
use wlf_map::RbTreeMap;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_patterns() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("map_insert_{pattern}"));

        group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
            b.iter(|| {
                let mut map = RbTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.bench_function(BenchmarkId::new("RbTreeMap/with_capacity", N), |b| {
            b.iter(|| {
                let mut map = RbTreeMap::with_capacity(keys.len());
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                map
            });
        });

        group.finish();
    }
}

fn bench_map_get(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let rb_map: RbTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

        let mut group = c.benchmark_group(format!("map_get_{pattern}"));

        group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Some(&v) = rb_map.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Some(&v) = bt_map.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.finish();
    }
}

fn bench_map_remove(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("map_remove_{pattern}"));

        group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<RbTreeMap<i64, i64>>(),
                |mut map| {
                    for &k in &keys {
                        map.remove(&k);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
                |mut map| {
                    for &k in &keys {
                        map.remove(&k);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

fn bench_map_iterate(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_map: RbTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_iterate");

    group.bench_function(BenchmarkId::new("RbTreeMap/iter", N), |b| {
        b.iter(|| rb_map.iter().fold(0i64, |sum, (_, &v)| sum.wrapping_add(v)));
    });

    group.bench_function(BenchmarkId::new("RbTreeMap/for_each_until", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            let flow: ControlFlow<()> = rb_map.for_each_until(|_, &v| {
                sum = sum.wrapping_add(v);
                ControlFlow::Continue(())
            });
            black_box(flow);
            sum
        });
    });

    group.bench_function(BenchmarkId::new("RbTreeMap/cursor", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            let mut cursor = rb_map.cursor();
            while let Some(&v) = cursor.value() {
                sum = sum.wrapping_add(v);
                cursor.move_next();
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap/iter", N), |b| {
        b.iter(|| bt_map.iter().fold(0i64, |sum, (_, &v)| sum.wrapping_add(v)));
    });

    group.finish();
}

criterion_group!(map_insert_benches, bench_map_insert);

criterion_group!(map_get_benches, bench_map_get);

criterion_group!(map_remove_benches, bench_map_remove);

criterion_group!(map_iterate_benches, bench_map_iterate);

criterion_main!(map_insert_benches, map_get_benches, map_remove_benches, map_iterate_benches);
