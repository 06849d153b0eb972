//! Benchmarks for range proof generation and verification

use benches::{ctrange_fixture, init_tracing, sequential_fixture};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use curve25519_dalek::scalar::Scalar;
use num_bigint::BigInt;
use range::{commit_range, ctrange};
use rand::thread_rng;
use zkrp_core::ProtocolGenerators;

fn bench_sequential_generation(c: &mut Criterion) {
    init_tracing();
    let mut group = c.benchmark_group("sequential_range_generation");
    let gens = ProtocolGenerators::standard();

    for bit_length in [8usize, 16, 32, 64] {
        group.throughput(Throughput::Elements(bit_length as u64));

        group.bench_with_input(
            BenchmarkId::new("prove", bit_length),
            &bit_length,
            |b, &bit_length| {
                let mut rng = thread_rng();
                let value = (BigInt::from(1) << (bit_length - 1)) - BigInt::from(1); // Near max value
                let blind = Scalar::random(&mut rng);

                b.iter(|| {
                    let proof = commit_range::RangeProof::prove(
                        &mut rng,
                        black_box(&value),
                        &blind,
                        &gens.g,
                        &gens.h,
                        black_box(bit_length),
                    )
                    .unwrap();
                    black_box(proof)
                });
            },
        );
    }

    group.finish();
}

fn bench_sequential_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_range_verification");

    for bit_length in [8usize, 16, 32, 64] {
        group.throughput(Throughput::Elements(bit_length as u64));

        // Pre-generate proof for verification benchmark
        let proof = sequential_fixture(bit_length).unwrap();

        group.bench_with_input(
            BenchmarkId::new("verify", bit_length),
            &bit_length,
            |b, _| {
                b.iter(|| {
                    assert!(black_box(&proof).verify().unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_ctrange(c: &mut Criterion) {
    init_tracing();
    let mut group = c.benchmark_group("ctrange");
    let gens = ProtocolGenerators::standard();
    group.throughput(Throughput::Elements(ctrange::RANGE_BITS as u64));

    group.bench_function("prove", |b| {
        b.iter(|| {
            let proof = ctrange::RangeProof::prove(black_box(0x7fff_ffff), &gens.g, &gens.h).unwrap();
            black_box(proof)
        });
    });

    let proof = ctrange_fixture(0x7fff_ffff).unwrap();
    group.bench_function("verify", |b| {
        b.iter(|| {
            assert!(black_box(&proof).verify().unwrap());
        });
    });

    let encoded = proof.to_string();
    group.bench_function("decode_base64", |b| {
        b.iter(|| {
            let decoded: ctrange::RangeProof = black_box(&encoded).parse().unwrap();
            black_box(decoded)
        });
    });

    group.finish();
}

fn bench_range_proof_size(_c: &mut Criterion) {
    init_tracing();
    for bit_length in [8usize, 16, 32, 64] {
        let proof = sequential_fixture(bit_length).unwrap();
        tracing::info!(bit_length, bytes = proof.to_bytes().len(), "sequential range proof size");
    }
    tracing::info!(bytes = ctrange::RANGE_PROOF_SIZE, "ctrange proof size");
}

criterion_group!(
    benches,
    bench_sequential_generation,
    bench_sequential_verification,
    bench_ctrange,
    bench_range_proof_size
);
criterion_main!(benches);
