extern crate criterion;
extern crate tvlzw;

use std::fs;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

pub fn criterion_benchmark(c: &mut Criterion, file: &str) {
    let data = fs::read(file)
        .expect("Benchmark input not found");
    let encoded = tvlzw::lzw_encode(&data).expect("Encoding failed");

    let mut group = c.benchmark_group("lzw");
    group.throughput(Throughput::Bytes(data.len() as u64));

    let id = BenchmarkId::new("encode", file);
    group.bench_with_input(id, &data, |b, data| b.iter(|| {
        black_box(tvlzw::lzw_encode(data).expect("Error"));
    }));

    let id = BenchmarkId::new("decode", file);
    group.bench_with_input(id, &encoded, |b, encoded| b.iter(|| {
        let decoded = tvlzw::lzw_decode(
            &encoded.data,
            encoded.data.len() as u32,
            encoded.bits,
            data.len() as u32,
        ).expect("Error");
        black_box(decoded);
    }));
    group.finish();
}

pub fn bench_toml(c: &mut Criterion) {
    criterion_benchmark(c, "Cargo.toml");
}

pub fn bench_source(c: &mut Criterion) {
    criterion_benchmark(c, "src/dict.rs");
}

pub fn bench_tests(c: &mut Criterion) {
    criterion_benchmark(c, "tests/implicit_reset.rs");
}

criterion_group!(benches, bench_toml, bench_source, bench_tests);
criterion_main!(benches);
