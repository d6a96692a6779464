use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dense_hashmap::DenseHashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn setup() -> (DenseHashMap<String, u64>, Vec<String>) {
    let mut m = DenseHashMap::new();
    m.set_empty_key(String::new());
    m.set_deleted_key("-".to_owned());
    let keys: Vec<String> = lcg(42).take(100_000).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.emplace(k, i as u64);
    }
    let queries = keys.iter().step_by(10).cloned().collect();
    (m, queries)
}

// Probing by &str against building a String for each lookup.
fn bench_find_by_substitute(c: &mut Criterion) {
    let (m, queries) = setup();
    let borrowed: Vec<&str> = queries.iter().map(String::as_str).collect();

    c.bench_function("lookup::find_str_10k", |b| {
        b.iter(|| {
            for q in &borrowed {
                black_box(m.find(*q));
            }
        })
    });

    c.bench_function("lookup::find_built_string_10k", |b| {
        b.iter(|| {
            for q in &borrowed {
                let owned = (*q).to_owned();
                black_box(m.find(&owned));
            }
        })
    });
}

// Emplace hits: a substitute builds nothing, a converted argument builds
// the key before probing.
fn bench_emplace_hit(c: &mut Criterion) {
    let (mut m, queries) = setup();
    let borrowed: Vec<&str> = queries.iter().map(String::as_str).collect();

    c.bench_function("lookup::emplace_hit_str_10k", |b| {
        b.iter(|| {
            for q in &borrowed {
                black_box(m.emplace(*q, 0));
            }
        })
    });

    c.bench_function("lookup::emplace_converted_hit_str_10k", |b| {
        b.iter(|| {
            for q in &borrowed {
                black_box(m.emplace_converted(*q, 0));
            }
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_find_by_substitute, bench_emplace_hit
}
criterion_main!(benches);
