//! Benchmarks for inner product argument

use benches::{init_tracing, ipa_fixture, IPA_BENCH_DOMAIN};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use curve25519_dalek::scalar::Scalar;
use ipa::{InnerProductParams, InnerProductProver, InnerProductVerifier};
use rand::thread_rng;
use zkrp_core::proof_transcript;

fn bench_ipa_generation(c: &mut Criterion) {
    init_tracing();
    let mut group = c.benchmark_group("ipa_generation");

    for vector_length in [8usize, 16, 32, 64, 128] {
        group.throughput(Throughput::Elements(vector_length as u64));

        group.bench_with_input(
            BenchmarkId::new("prove", vector_length),
            &vector_length,
            |b, &vector_length| {
                let mut rng = thread_rng();
                let params = InnerProductParams::setup(vector_length).unwrap();
                let prover = InnerProductProver::new(params);

                // Generate random vectors
                let a: Vec<Scalar> = (0..vector_length).map(|_| Scalar::random(&mut rng)).collect();
                let b_vec: Vec<Scalar> = (0..vector_length).map(|_| Scalar::random(&mut rng)).collect();

                b.iter(|| {
                    let mut transcript = proof_transcript(IPA_BENCH_DOMAIN);
                    let proof = prover
                        .prove(&mut transcript, black_box(&a), black_box(&b_vec))
                        .unwrap();
                    black_box(proof)
                });
            },
        );
    }

    group.finish();
}

fn bench_ipa_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipa_verification");

    for vector_length in [8usize, 16, 32, 64, 128] {
        group.throughput(Throughput::Elements(vector_length as u64));

        // Pre-generate proof for verification benchmark
        let (params, a, b_vec, proof) = ipa_fixture(vector_length).unwrap();
        let p = params.commit(&a, &b_vec).unwrap();
        let verifier = InnerProductVerifier::new(params);

        group.bench_with_input(
            BenchmarkId::new("verify", vector_length),
            &vector_length,
            |b, _| {
                b.iter(|| {
                    let mut transcript = proof_transcript(IPA_BENCH_DOMAIN);
                    assert!(verifier.verify(&mut transcript, black_box(&proof), &p).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_ipa_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipa_setup");

    for vector_length in [8usize, 64, 512] {
        group.bench_with_input(
            BenchmarkId::new("setup", vector_length),
            &vector_length,
            |b, &vector_length| {
                b.iter(|| black_box(InnerProductParams::setup(black_box(vector_length)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_ipa_proof_size(_c: &mut Criterion) {
    init_tracing();
    for vector_length in [8usize, 16, 32, 64, 128] {
        let (_, _, _, proof) = ipa_fixture(vector_length).unwrap();
        tracing::info!(vector_length, bytes = proof.size_bytes(), "IPA proof size");
    }
}

criterion_group!(
    benches,
    bench_ipa_generation,
    bench_ipa_verification,
    bench_ipa_setup,
    bench_ipa_proof_size
);
criterion_main!(benches);
