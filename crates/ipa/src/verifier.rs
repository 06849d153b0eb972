//! Inner Product Argument verifier implementation

use crate::{InnerProductParams, InnerProductProof};
use curve25519_dalek::scalar::Scalar;
use subtle::Choice;
use tracing::{debug, instrument};
use zkrp_core::{ChallengeTranscript, GroupElement, ZkError, ZkResult};

/// Inner Product Argument verifier
#[derive(Debug, Clone)]
pub struct InnerProductVerifier {
    params: InnerProductParams,
}

impl InnerProductVerifier {
    /// Create a new IPA verifier with the given parameters
    pub fn new(params: InnerProductParams) -> Self {
        Self { params }
    }

    /// Verify an inner product proof for commitment `p`
    ///
    /// Replays every folding round: the generators are folded exactly as the
    /// prover folded them and `P' = L^{x^2} * P * R^{x^{-2}}`. Accepts iff
    /// `g_f^a * h_f^b * u^{ab} == P_final`, the replayed generators match the
    /// ones in the proof and the proof was made for `p`.
    #[instrument(skip_all, fields(n = self.params.n))]
    pub fn verify<T: ChallengeTranscript>(
        &self,
        transcript: &mut T,
        proof: &InnerProductProof,
        p: &GroupElement,
    ) -> ZkResult<bool> {
        proof.validate_structure()?;
        if proof.n != self.params.n {
            return Err(ZkError::InvalidParams(format!(
                "verifier set up for n = {}, proof has n = {}",
                self.params.n, proof.n
            )));
        }

        transcript.append_u64(b"n", self.params.n as u64);
        transcript.append_point(b"P", p);

        let mut g = self.params.g_vec.clone();
        let mut h = self.params.h_vec.clone();
        let mut p_folded = *p;

        for (l, r) in proof.l_vec.iter().zip(proof.r_vec.iter()) {
            transcript.append_point(b"L", l);
            transcript.append_point(b"R", r);
            let x = transcript.challenge_scalar(b"x");
            if x == Scalar::ZERO {
                debug!("zero folding challenge, rejecting");
                return Ok(false);
            }
            let x_inv = x.invert();

            let m = g.len() / 2;
            let (g_l, g_r) = g.split_at(m);
            let (h_l, h_r) = h.split_at(m);
            let folded_g = (0..m).map(|i| g_l[i] * x_inv + g_r[i] * x).collect();
            let folded_h = (0..m).map(|i| h_l[i] * x + h_r[i] * x_inv).collect();
            g = folded_g;
            h = folded_h;

            p_folded = *l * (x * x) + p_folded + *r * (x_inv * x_inv);
        }

        let (g_final, h_final) = (g[0], h[0]);
        let expected = GroupElement::multiscalar_mul(
            [proof.a, proof.b, proof.a * proof.b],
            [g_final.0, h_final.0, self.params.u.0],
        );

        let ok: Choice = expected.ct_eq(&p_folded)
            & g_final.ct_eq(&proof.g_final)
            & h_final.ct_eq(&proof.h_final)
            & self.params.u.ct_eq(&proof.u)
            & p.ct_eq(&proof.p);
        let ok = bool::from(ok);
        debug!(ok, "inner product proof verified");
        Ok(ok)
    }
}
