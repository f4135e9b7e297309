// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stream Codec Benchmark
//!
//! Measures the cost of:
//! - Scalar encode/decode (u8, u32, f64)
//! - C string encode/decode at several lengths
//! - Array coding through `code_array` (typed and raw elements)
//!
//! Everything runs on stack-allocated streams, no I/O.

#![allow(clippy::uninlined_format_args)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use poke_stream::array::{elements, Encoder, RawEncoder, StreamDecoder};
use poke_stream::{code_array, Stream};
use std::hint::black_box as bb;

const CAPACITY: usize = 4096;

/// Benchmark scalar encode then decode of a full stream
fn bench_scalars(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_roundtrip");

    group.throughput(Throughput::Bytes(CAPACITY as u64));
    group.bench_function("u8", |b| {
        let mut stream = Stream::<CAPACITY>::new();
        b.iter(|| {
            stream.reset();
            while stream.encode_u8(bb(0xA5)).is_ok() {}
            stream.seal();
            while let Ok(v) = stream.decode_u8() {
                bb(v);
            }
        });
    });

    group.bench_function("u32", |b| {
        let mut stream = Stream::<CAPACITY>::new();
        b.iter(|| {
            stream.reset();
            while stream.encode_u32(bb(0xDEAD_BEEF)).is_ok() {}
            stream.seal();
            while let Ok(v) = stream.decode_u32() {
                bb(v);
            }
        });
    });

    group.bench_function("f64", |b| {
        let mut stream = Stream::<CAPACITY>::new();
        b.iter(|| {
            stream.reset();
            while stream.encode_f64(bb(core::f64::consts::PI)).is_ok() {}
            stream.seal();
            while let Ok(v) = stream.decode_f64() {
                bb(v);
            }
        });
    });

    group.finish();
}

/// Benchmark string encode/decode by length
fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_roundtrip");

    for len in [0usize, 8, 64, 512] {
        let text = "x".repeat(len);
        group.throughput(Throughput::Bytes(len as u64 + 1));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            let mut stream = Stream::<CAPACITY>::new();
            b.iter(|| {
                stream.reset();
                stream.encode_str(bb(text.as_str())).unwrap();
                stream.seal();
                bb(stream.decode_str().unwrap().len());
            });
        });
    }

    group.finish();
}

/// Benchmark array coding through the element-coder loop
fn bench_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_array");

    let values: Vec<u32> = (0..1024).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("typed_u32_1024", |b| {
        let mut stream = Stream::<CAPACITY>::new();
        let mut back = vec![0u32; values.len()];
        b.iter(|| {
            stream.reset();
            code_array(&mut stream, bb(&values), Encoder).unwrap();
            stream.seal();
            code_array(&mut stream, &mut back, StreamDecoder).unwrap();
        });
        bb(&back);
    });

    let region = vec![0x5Au8; 1024 * 4];
    group.bench_function("raw_4b_1024", |b| {
        let mut stream = Stream::<CAPACITY>::new();
        b.iter(|| {
            stream.reset();
            let chunks = elements(bb(region.as_slice()), 1024, 4).unwrap();
            code_array(&mut stream, chunks, RawEncoder).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scalars, bench_strings, bench_arrays);
criterion_main!(benches);
