//! Criterion benchmarks for the pwgen fixed-layout codec and generators.
//!
//! Run with:
//! ```bash
//! cargo bench --package pwgen-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pwgen_core::protocol::codec::{decode_message, encode_message};
use pwgen_core::protocol::messages::{MenuMessage, PasswordRequest, PasswordResponse};
use pwgen_core::{generate_password, validate_request, LengthBounds, PasswordClass};

/// Benchmarks `encode_message` for every message type.
fn bench_encode(c: &mut Criterion) {
    let menu = MenuMessage::default();
    let request = PasswordRequest::new('s', "32");
    let success = PasswordResponse::success("Ab3$Ab3$Ab3$Ab3$Ab3$Ab3$Ab3$Ab3$");
    let error = PasswordResponse::error("The length for the password is not valid.\n");

    let mut group = c.benchmark_group("encode_message");
    group.bench_function("Menu", |b| {
        b.iter(|| encode_message(black_box(&menu)).expect("encode must succeed"))
    });
    group.bench_function("PasswordRequest", |b| {
        b.iter(|| encode_message(black_box(&request)).expect("encode must succeed"))
    });
    group.bench_function("PasswordResponse/Success", |b| {
        b.iter(|| encode_message(black_box(&success)).expect("encode must succeed"))
    });
    group.bench_function("PasswordResponse/Error", |b| {
        b.iter(|| encode_message(black_box(&error)).expect("encode must succeed"))
    });
    group.finish();
}

/// Benchmarks `decode_message` from pre-encoded bytes.
fn bench_decode(c: &mut Criterion) {
    let menu = encode_message(&MenuMessage::default()).expect("encode for benchmark setup");
    let request =
        encode_message(&PasswordRequest::new('m', "16")).expect("encode for benchmark setup");
    let response = encode_message(&PasswordResponse::success("abc123def456"))
        .expect("encode for benchmark setup");

    let mut group = c.benchmark_group("decode_message");
    group.bench_function("Menu", |b| {
        b.iter(|| decode_message::<MenuMessage>(black_box(&menu)).expect("decode must succeed"))
    });
    group.bench_function("PasswordRequest", |b| {
        b.iter(|| {
            decode_message::<PasswordRequest>(black_box(&request)).expect("decode must succeed")
        })
    });
    group.bench_function("PasswordResponse", |b| {
        b.iter(|| {
            decode_message::<PasswordResponse>(black_box(&response)).expect("decode must succeed")
        })
    });
    group.finish();
}

/// Benchmarks one full server round: validate, then generate.
fn bench_validate_and_generate(c: &mut Criterion) {
    let bounds = LengthBounds::default();
    let mut group = c.benchmark_group("validate_and_generate");
    for class in PasswordClass::ALL {
        group.bench_with_input(
            BenchmarkId::new("class", class.selector()),
            &class,
            |b, class| {
                b.iter(|| {
                    let (class, length) =
                        validate_request(black_box(class.selector()), black_box("32"), bounds)
                            .expect("valid request");
                    generate_password(class, length)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_validate_and_generate);
criterion_main!(benches);
