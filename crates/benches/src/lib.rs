//! Benchmarks for the range proof workspace
//!
//! This crate contains performance benchmarks for:
//! - Binary and same-value sigma proofs
//! - Sequential and concurrent range proof generation and verification
//! - Inner product argument (IPA) operations
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p benches
//! ```
//!
//! Or run specific benchmarks:
//! ```bash
//! cargo bench -p benches --bench range_proof
//! cargo bench -p benches --bench ipa
//! ```
//!
//! Set `RUST_LOG=debug` to see the provers' phase logging while benchmarking.

use anyhow::Context;
use curve25519_dalek::scalar::Scalar;
use ipa::{InnerProductParams, InnerProductProof, InnerProductProver};
use num_bigint::BigInt;
use rand::thread_rng;
use tracing_subscriber::EnvFilter;
use zkrp_core::{proof_transcript, ProtocolGenerators};

/// Transcript domain shared by the IPA fixtures and benchmarks
pub const IPA_BENCH_DOMAIN: &[u8] = b"ipa_benchmark";

/// Install a `fmt` subscriber filtered by `RUST_LOG`, once per process
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// A sequential range proof for a value close to `2^bits`
pub fn sequential_fixture(bits: usize) -> anyhow::Result<range::commit_range::RangeProof> {
    let gens = ProtocolGenerators::standard();
    let mut rng = thread_rng();
    let value = (BigInt::from(1) << bits) - BigInt::from(1);
    let blind = Scalar::random(&mut rng);
    range::commit_range::RangeProof::prove(&mut rng, &value, &blind, &gens.g, &gens.h, bits)
        .with_context(|| format!("sequential range proof for {} bits", bits))
}

/// A concurrent range proof for `value`
pub fn ctrange_fixture(value: i64) -> anyhow::Result<range::ctrange::RangeProof> {
    let gens = ProtocolGenerators::standard();
    let (_, proof) = range::ctrange::RangeProof::prove(value, &gens.g, &gens.h)
        .with_context(|| format!("ctrange proof for {}", value))?;
    Ok(proof)
}

/// Random vectors of length `n` with their parameters and proof
pub fn ipa_fixture(
    n: usize,
) -> anyhow::Result<(InnerProductParams, Vec<Scalar>, Vec<Scalar>, InnerProductProof)> {
    let mut rng = thread_rng();
    let params = InnerProductParams::setup(n).context("inner product setup")?;
    let a: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();
    let b: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut rng)).collect();

    let mut transcript = proof_transcript(IPA_BENCH_DOMAIN);
    let proof = InnerProductProver::new(params.clone())
        .prove(&mut transcript, &a, &b)
        .context("inner product proof")?;
    Ok((params, a, b, proof))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_verify() {
        init_tracing();
        assert!(sequential_fixture(16).unwrap().verify().unwrap());
        assert!(ctrange_fixture(12345).unwrap().verify().unwrap());

        let (params, a, b, proof) = ipa_fixture(8).unwrap();
        let p = params.commit(&a, &b).unwrap();
        let mut transcript = proof_transcript(IPA_BENCH_DOMAIN);
        assert!(ipa::InnerProductVerifier::new(params)
            .verify(&mut transcript, &proof, &p)
            .unwrap());
    }
}
