//! Same-value commitment proof
//!
//! Proves that `T = g^b h^r` and `T' = g^b h^{r'}` open to the same `b`
//! under independent blinding factors.
//!
//! ```text
//! commit:    A_T = g^{α_b} h^{α_r},   A_T' = g^{α_b} h^{α_r'}
//! challenge: c = H(g, h, T, T', A_T, A_T')
//! respond:   z_b = α_b + c·b,  z_r = α_r + c·r,  z_r' = α_r' + c·r'
//! verify:    g^{z_b} h^{z_r} == A_T · T^c   and   g^{z_b} h^{z_r'} == A_T' · T'^c
//! ```

use curve25519_dalek::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::Choice;
use tracing::debug;
use zkrp_core::{ChallengeTranscript, GroupElement, Sha256Transcript, ZkError, ZkResult};

/// Domain label of standalone same-value proofs
pub const SAME_VALUE_DOMAIN: &[u8] = b"zkrp_same_value_proof";

fn check_generators(g: &GroupElement, h: &GroupElement) -> ZkResult<()> {
    if g.is_identity() || h.is_identity() {
        return Err(ZkError::InvalidSameValueParams(
            "generators must not be the identity".to_string(),
        ));
    }
    Ok(())
}

/// Secret witness: the shared value and both blinding factors
#[derive(Debug, Clone, Copy)]
pub struct SameValueWitness {
    pub b: Scalar,
    pub r: Scalar,
    pub r_prime: Scalar,
}

/// Prover state after the commit move
#[derive(Debug, Clone)]
pub struct SameValueCommitment {
    /// `g^{α_b} h^{α_r}`
    pub a_t: GroupElement,
    /// `g^{α_b} h^{α_r'}`
    pub a_t_prime: GroupElement,
    alpha_b: Scalar,
    alpha_r: Scalar,
    alpha_r_prime: Scalar,
}

impl SameValueCommitment {
    /// Sample `α_b, α_r, α_r'` and commit to them
    pub fn commit<R: RngCore + CryptoRng>(
        rng: &mut R,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<Self> {
        check_generators(g, h)?;
        let alpha_b = Scalar::random(rng);
        let alpha_r = Scalar::random(rng);
        let alpha_r_prime = Scalar::random(rng);

        let a_t = GroupElement::multiscalar_mul([alpha_b, alpha_r], [g.0, h.0]);
        let a_t_prime = GroupElement::multiscalar_mul([alpha_b, alpha_r_prime], [g.0, h.0]);

        Ok(Self {
            a_t,
            a_t_prime,
            alpha_b,
            alpha_r,
            alpha_r_prime,
        })
    }

    /// Append `A_T, A_T'` to a transcript
    pub fn append_to<T: ChallengeTranscript>(&self, transcript: &mut T) {
        transcript.append_point(b"A_T", &self.a_t);
        transcript.append_point(b"A_T'", &self.a_t_prime);
    }

    /// Answer challenge `c`
    pub fn respond(self, c: &Scalar, witness: &SameValueWitness) -> SameValueProof {
        SameValueProof {
            a_t: self.a_t,
            a_t_prime: self.a_t_prime,
            zb: self.alpha_b + c * witness.b,
            zr: self.alpha_r + c * witness.r,
            zr_prime: self.alpha_r_prime + c * witness.r_prime,
        }
    }
}

/// Non-interactive proof that two commitments hide the same value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SameValueProof {
    pub a_t: GroupElement,
    pub a_t_prime: GroupElement,
    pub zb: Scalar,
    pub zr: Scalar,
    pub zr_prime: Scalar,
}

impl SameValueProof {
    /// Prove that `t` and `t_prime` both commit to `witness.b`
    pub fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        witness: &SameValueWitness,
        t: &GroupElement,
        t_prime: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<Self> {
        let mut transcript = Sha256Transcript::new(SAME_VALUE_DOMAIN);
        Self::prove_with_transcript(rng, &mut transcript, witness, t, t_prime, g, h)
    }

    /// [`SameValueProof::prove`] over a caller supplied transcript
    pub fn prove_with_transcript<R, T>(
        rng: &mut R,
        transcript: &mut T,
        witness: &SameValueWitness,
        t: &GroupElement,
        t_prime: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<Self>
    where
        R: RngCore + CryptoRng,
        T: ChallengeTranscript,
    {
        let commitment = SameValueCommitment::commit(rng, g, h)?;
        append_statement(transcript, g, h, t, t_prime);
        commitment.append_to(transcript);
        let c = transcript.challenge_scalar(b"c");
        Ok(commitment.respond(&c, witness))
    }

    /// Verify a standalone proof
    pub fn verify(
        &self,
        t: &GroupElement,
        t_prime: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<bool> {
        let mut transcript = Sha256Transcript::new(SAME_VALUE_DOMAIN);
        self.verify_with_transcript(&mut transcript, t, t_prime, g, h)
    }

    /// [`SameValueProof::verify`] over a caller supplied transcript
    pub fn verify_with_transcript<T: ChallengeTranscript>(
        &self,
        transcript: &mut T,
        t: &GroupElement,
        t_prime: &GroupElement,
        g: &GroupElement,
        h: &GroupElement,
    ) -> ZkResult<bool> {
        check_generators(g, h)?;
        append_statement(transcript, g, h, t, t_prime);
        transcript.append_point(b"A_T", &self.a_t);
        transcript.append_point(b"A_T'", &self.a_t_prime);
        let c = transcript.challenge_scalar(b"c");

        let ok = bool::from(self.verify_with_challenge(t, t_prime, &c, g, h));
        debug!(ok, "same-value proof verified");
        Ok(ok)
    }

    /// Check both equations under an externally derived challenge
    pub fn verify_with_challenge(
        &self,
        t: &GroupElement,
        t_prime: &GroupElement,
        c: &Scalar,
        g: &GroupElement,
        h: &GroupElement,
    ) -> Choice {
        let lhs = GroupElement::multiscalar_mul([self.zb, self.zr], [g.0, h.0]);
        let rhs = self.a_t + *t * c;

        let lhs_prime = GroupElement::multiscalar_mul([self.zb, self.zr_prime], [g.0, h.0]);
        let rhs_prime = self.a_t_prime + *t_prime * c;

        lhs.ct_eq(&rhs) & lhs_prime.ct_eq(&rhs_prime)
    }
}

fn append_statement<T: ChallengeTranscript>(
    transcript: &mut T,
    g: &GroupElement,
    h: &GroupElement,
    t: &GroupElement,
    t_prime: &GroupElement,
) {
    transcript.append_point(b"g", g);
    transcript.append_point(b"h", h);
    transcript.append_point(b"T", t);
    transcript.append_point(b"T'", t_prime);
}
