//! Benchmarks for the binary and same-value sigma proofs

use benches::init_tracing;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use curve25519_dalek::scalar::Scalar;
use rand::thread_rng;
use sigma::{BinaryProof, SameValueProof, SameValueWitness};
use zkrp_core::{pedersen, ProtocolGenerators};

fn bench_binary(c: &mut Criterion) {
    init_tracing();
    let mut group = c.benchmark_group("binary_proof");
    let gens = ProtocolGenerators::standard();
    let mut rng = thread_rng();
    let r = Scalar::random(&mut rng);

    group.bench_function("prove", |b| {
        b.iter(|| {
            let proof = BinaryProof::prove(&mut rng, black_box(1), &r, &gens.g, &gens.h).unwrap();
            black_box(proof)
        });
    });

    let (a, proof) = BinaryProof::prove(&mut thread_rng(), 1, &r, &gens.g, &gens.h).unwrap();
    group.bench_function("verify", |b| {
        b.iter(|| {
            assert!(black_box(&proof).verify(&a, &gens.g, &gens.h).unwrap());
        });
    });

    group.finish();
}

fn bench_same_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("same_value_proof");
    let gens = ProtocolGenerators::standard();
    let mut rng = thread_rng();
    let witness = SameValueWitness {
        b: Scalar::from(1_000_000u64),
        r: Scalar::random(&mut rng),
        r_prime: Scalar::random(&mut rng),
    };
    let t = pedersen::commit(&witness.b, &witness.r, &gens.g, &gens.h).unwrap();
    let t_prime = pedersen::commit(&witness.b, &witness.r_prime, &gens.g, &gens.h).unwrap();

    group.bench_function("prove", |b| {
        b.iter(|| {
            let proof =
                SameValueProof::prove(&mut rng, black_box(&witness), &t, &t_prime, &gens.g, &gens.h)
                    .unwrap();
            black_box(proof)
        });
    });

    let proof =
        SameValueProof::prove(&mut thread_rng(), &witness, &t, &t_prime, &gens.g, &gens.h).unwrap();
    group.bench_function("verify", |b| {
        b.iter(|| {
            assert!(black_box(&proof).verify(&t, &t_prime, &gens.g, &gens.h).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_binary, bench_same_value);
criterion_main!(benches);
