//! Interner benchmarks.
//!
//! Run with: `cargo bench --bench symbol_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cflex_util::Interner;

fn bench_intern_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("intern_miss");
    group.throughput(Throughput::Elements(1));
    group.bench_function("new_string_each_call", |b| {
        let interner = Interner::new();
        let mut counter = 0u64;
        b.iter(|| {
            counter += 1;
            black_box(interner.intern(format!("new_string_{counter}").as_bytes()))
        })
    });
    group.finish();
}

fn bench_intern_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("intern_hit");
    group.throughput(Throughput::Elements(1));
    group.bench_function("existing_string", |b| {
        let interner = Interner::new();
        let _ = interner.intern(b"existing_string");
        b.iter(|| black_box(interner.intern(b"existing_string")))
    });
    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparison");
    group.throughput(Throughput::Elements(1));
    let interner = Interner::new();
    let a = interner.intern(b"hello");
    let b2 = interner.intern(b"hello");
    let c2 = interner.intern(b"world");
    group.bench_function("symbol_eq", |b| {
        b.iter(|| {
            black_box(a == b2);
            black_box(a == c2);
        })
    });
    group.finish();
}

fn bench_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("varying_sizes");
    for &size in &[1usize, 10, 100, 1000, 10000] {
        let string = "a".repeat(size);
        group.bench_with_input(BenchmarkId::new("intern", size), &string, |b, s| {
            let interner = Interner::new();
            b.iter(|| black_box(interner.intern(s.as_bytes())))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_intern_miss,
    bench_intern_hit,
    bench_comparison,
    bench_varying_sizes,
);
criterion_main!(benches);
