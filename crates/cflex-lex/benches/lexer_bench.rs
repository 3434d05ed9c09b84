//! Lexer benchmarks: run with `cargo bench --package cflex-lex`.

use std::io::Write;

use cflex_lex::{Context, Lexer};
use cflex_util::Interner;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn lex_token_count(source: &[u8]) -> usize {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(source).unwrap();
    f.flush().unwrap();
    let ctx = Context::default();
    let interner = Interner::new();
    let mut lexer = Lexer::new(f.path().to_str().unwrap(), &ctx, &interner).unwrap();
    let mut count = 0;
    loop {
        let t = lexer.next_token();
        count += 1;
        if t.is_eof() {
            break;
        }
    }
    count
}

fn bench_simple_statement(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    let source = b"int x = 1 + 2;";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("simple_statement", |b| {
        b.iter(|| lex_token_count(black_box(source)))
    });
    group.finish();
}

fn bench_function_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    let source = br#"
        int fibonacci(int n) {
            if (n <= 1) {
                return n;
            }
            return fibonacci(n - 1) + fibonacci(n - 2);
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("function_body", |b| {
        b.iter(|| lex_token_count(black_box(source)))
    });
    group.finish();
}

fn bench_string_concatenation(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    let source = br#""part one " "part two " "part three""#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("string_concatenation", |b| {
        b.iter(|| lex_token_count(black_box(source)))
    });
    group.finish();
}

fn bench_directive_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    let source =
        b"#include <stdio.h>\n#include <stdlib.h>\n#define MAX(a, b) ((a) > (b) ? (a) : (b))\n";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("directive_heavy", |b| {
        b.iter(|| lex_token_count(black_box(source)))
    });
    group.finish();
}

fn bench_numeric_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    let source = b"123456 0xDEADBEEF 3.14159 0x1.fp3 1'000'000";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("numeric_literals", |b| {
        b.iter(|| lex_token_count(black_box(source)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_simple_statement,
    bench_function_body,
    bench_string_concatenation,
    bench_directive_heavy,
    bench_numeric_literals
);
criterion_main!(benches);
