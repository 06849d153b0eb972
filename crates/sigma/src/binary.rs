//! Binary (bit) proof
//!
//! Proves that `A = g^b * h^r` commits to `b ∈ {0, 1}` without revealing
//! `b` or `r`.
//!
//! ```text
//! commit:    Ca = g^a h^s,   Cb = g^{a·b} h^t
//! challenge: c = H(transcript)
//! respond:   f = b·c + a,  za = r·c + s,  zb = r·(c − f) + t
//! verify:    A^c · Ca == g^f h^za   and   A^{c−f} · Cb == h^zb
//! ```
//!
//! The second check holds because `b·(c − f) + a·b = c·b·(1 − b)`, which
//! vanishes exactly when `b` is a bit.
//!
//! The commit and respond steps are exposed separately so the range
//! assemblies can bind many bit proofs to one shared challenge.

use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::Choice;
use tracing::debug;
use zkrp_core::{
    pedersen, ChallengeTranscript, GroupElement, Sha256Transcript, ZkError, ZkResult,
};

/// Domain label of standalone binary proofs
pub const BINARY_DOMAIN: &[u8] = b"zkrp_binary_proof";

fn check_params(bit: u8, g: &GroupElement, h: &GroupElement) -> ZkResult<()> {
    if bit > 1 {
        return Err(ZkError::InvalidBinaryParams(format!("{} is not a bit", bit)));
    }
    if g.is_identity() || h.is_identity() {
        return Err(ZkError::InvalidBinaryParams(
            "generators must not be the identity".to_string(),
        ));
    }
    Ok(())
}

/// Prover state after the commit move
#[derive(Debug, Clone)]
pub struct BinaryCommitment {
    /// `g^a h^s`
    pub ca: GroupElement,
    /// `g^{a·b} h^t`
    pub cb: GroupElement,
    a: Scalar,
    s: Scalar,
    t: Scalar,
}

impl BinaryCommitment {
    /// Sample `a, s, t` and commit to them
    pub fn commit<R: RngCore + CryptoRng>(
        rng: &mut R,
        bit: u8,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<Self> {
        check_params(bit, g, h)?;
        let a = Scalar::random(rng);
        let s = Scalar::random(rng);
        let t = Scalar::random(rng);
        let ab = a * Scalar::from(bit);

        let ca = pedersen::commit(&a, &s, g, h)?;
        let cb = pedersen::commit(&ab, &t, g, h)?;

        Ok(Self { ca, cb, a, s, t })
    }

    /// Append `Ca, Cb` to a transcript
    pub fn append_to<T: ChallengeTranscript>(&self, transcript: &mut T) {
        transcript.append_point(b"Ca", &self.ca);
        transcript.append_point(b"Cb", &self.cb);
    }

    /// Answer challenge `c` for the bit committed as `g^bit h^r`
    pub fn respond(self, c: &Scalar, bit: u8, r: &Scalar) -> ZkResult<BinaryProof> {
        if bit > 1 {
            return Err(ZkError::InvalidBinaryParams(format!("{} is not a bit", bit)));
        }
        let b = Scalar::from(bit);
        let f = b * c + self.a;
        let za = r * c + self.s;
        let zb = r * (c - f) + self.t;

        Ok(BinaryProof {
            ca: self.ca,
            cb: self.cb,
            f,
            za,
            zb,
        })
    }
}

/// Non-interactive proof that a commitment opens to 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryProof {
    pub ca: GroupElement,
    pub cb: GroupElement,
    pub f: Scalar,
    pub za: Scalar,
    pub zb: Scalar,
}

impl BinaryProof {
    /// Commit to `bit` with blinding `r` and prove it is binary.
    ///
    /// Returns the commitment `A = g^bit h^r` together with the proof. The
    /// challenge is drawn from a SHA-256 transcript over `g, h, A, Ca, Cb`.
    pub fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        bit: u8,
        r: &Scalar,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<(GroupElement, BinaryProof)> {
        let mut transcript = Sha256Transcript::new(BINARY_DOMAIN);
        Self::prove_with_transcript(rng, &mut transcript, bit, r, g, h)
    }

    /// [`BinaryProof::prove`] over a caller supplied transcript
    pub fn prove_with_transcript<R, T>(
        rng: &mut R,
        transcript: &mut T,
        bit: u8,
        r: &Scalar,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<(GroupElement, BinaryProof)>
    where
        R: RngCore + CryptoRng,
        T: ChallengeTranscript,
    {
        check_params(bit, g, h)?;
        let a_commit = pedersen::commit(&Scalar::from(bit), r, g, h)?;
        let commitment = BinaryCommitment::commit(rng, bit, g, h)?;

        append_statement(transcript, g, h, &a_commit);
        commitment.append_to(transcript);
        let c = transcript.challenge_scalar(b"c");

        Ok((a_commit, commitment.respond(&c, bit, r)?))
    }

    /// Verify a standalone proof for commitment `a_commit`
    pub fn verify(
        &self,
        a_commit: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<bool> {
        let mut transcript = Sha256Transcript::new(BINARY_DOMAIN);
        self.verify_with_transcript(&mut transcript, a_commit, g, h)
    }

    /// [`BinaryProof::verify`] over a caller supplied transcript
    pub fn verify_with_transcript<T: ChallengeTranscript>(
        &self,
        transcript: &mut T,
        a_commit: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<bool> {
        check_params(0, g, h)?;
        append_statement(transcript, g, h, a_commit);
        transcript.append_point(b"Ca", &self.ca);
        transcript.append_point(b"Cb", &self.cb);
        let c = transcript.challenge_scalar(b"c");

        let ok = bool::from(self.verify_with_challenge(a_commit, &c, g, h));
        debug!(ok, "binary proof verified");
        Ok(ok)
    }

    /// Check both verification equations under an externally derived
    /// challenge. Both equations are always evaluated.
    pub fn verify_with_challenge(
        &self,
        a_commit: &GroupElement,
        c: &Scalar,
        g: &GroupElement,
        h: &GroupElement,
    ) -> Choice {
        // A^c · Ca == g^f h^za
        let lhs_a = *a_commit * c + self.ca;
        let rhs_a = GroupElement::multiscalar_mul([self.f, self.za], [g.0, h.0]);

        // A^{c−f} · Cb == h^zb
        let lhs_b = *a_commit * (c - self.f) + self.cb;
        let rhs_b = *h * self.zb;

        lhs_a.ct_eq(&rhs_a) & lhs_b.ct_eq(&rhs_b)
    }
}

fn append_statement<T: ChallengeTranscript>(
    transcript: &mut T,
    g: &GroupElement,
    h: &GroupElement,
    a_commit: &GroupElement,
) {
    transcript.append_point(b"g", g);
    transcript.append_point(b"h", h);
    transcript.append_point(b"A", a_commit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use zkrp_core::{proof_transcript, ProtocolGenerators};

    #[test]
    fn test_bits_verify() {
        let gens = ProtocolGenerators::standard();
        for bit in [0u8, 1u8] {
            let r = Scalar::random(&mut OsRng);
            let (a, proof) = BinaryProof::prove(&mut OsRng, bit, &r, &gens.g, &gens.h).unwrap();
            assert!(proof.verify(&a, &gens.g, &gens.h).unwrap(), "bit {} failed", bit);
        }
    }

    #[test]
    fn test_non_bit_rejected() {
        let gens = ProtocolGenerators::standard();
        let r = Scalar::random(&mut OsRng);
        let result = BinaryProof::prove(&mut OsRng, 2, &r, &gens.g, &gens.h);
        assert!(matches!(result, Err(ZkError::InvalidBinaryParams(_))));
    }

    #[test]
    fn test_identity_generator_rejected() {
        let gens = ProtocolGenerators::standard();
        let r = Scalar::random(&mut OsRng);
        let id = GroupElement::identity();
        assert!(BinaryProof::prove(&mut OsRng, 1, &r, &id, &gens.h).is_err());
        assert!(BinaryCommitment::commit(&mut OsRng, 0, &gens.g, &id).is_err());
    }

    #[test]
    fn test_commitment_to_two_fails() {
        // Run the protocol honestly on a commitment to 2; the second equation
        // must fail because b·(1 − b) ≠ 0.
        let gens = ProtocolGenerators::standard();
        let r = Scalar::random(&mut OsRng);
        let two = Scalar::from(2u64);
        let a_commit = pedersen::commit(&two, &r, &gens.g, &gens.h).unwrap();

        let a = Scalar::random(&mut OsRng);
        let s = Scalar::random(&mut OsRng);
        let t = Scalar::random(&mut OsRng);
        let ca = pedersen::commit(&a, &s, &gens.g, &gens.h).unwrap();
        let cb = pedersen::commit(&(a * two), &t, &gens.g, &gens.h).unwrap();
        let c = Scalar::random(&mut OsRng);
        let f = two * c + a;
        let proof = BinaryProof {
            ca,
            cb,
            f,
            za: r * c + s,
            zb: r * (c - f) + t,
        };

        assert!(!bool::from(proof.verify_with_challenge(&a_commit, &c, &gens.g, &gens.h)));
    }

    #[test]
    fn test_tampered_response_fails() {
        let gens = ProtocolGenerators::standard();
        let r = Scalar::random(&mut OsRng);
        let (a, mut proof) = BinaryProof::prove(&mut OsRng, 1, &r, &gens.g, &gens.h).unwrap();
        proof.za += Scalar::ONE;
        assert!(!proof.verify(&a, &gens.g, &gens.h).unwrap());
    }

    #[test]
    fn test_wrong_commitment_fails() {
        let gens = ProtocolGenerators::standard();
        let r = Scalar::random(&mut OsRng);
        let (a, proof) = BinaryProof::prove(&mut OsRng, 0, &r, &gens.g, &gens.h).unwrap();
        assert!(!proof.verify(&(a + gens.g), &gens.g, &gens.h).unwrap());
    }

    #[test]
    fn test_merlin_transcript_variant() {
        let gens = ProtocolGenerators::standard();
        let r = Scalar::random(&mut OsRng);
        let mut prover_transcript = proof_transcript(b"binary_test");
        let (a, proof) = BinaryProof::prove_with_transcript(
            &mut OsRng,
            &mut prover_transcript,
            1,
            &r,
            &gens.g,
            &gens.h,
        )
        .unwrap();

        let mut verifier_transcript = proof_transcript(b"binary_test");
        assert!(proof
            .verify_with_transcript(&mut verifier_transcript, &a, &gens.g, &gens.h)
            .unwrap());

        // Mixing transcript kinds between prover and verifier must fail
        assert!(!proof.verify(&a, &gens.g, &gens.h).unwrap());
    }
}
