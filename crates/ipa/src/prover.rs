//! Inner Product Argument prover implementation

use crate::{InnerProductParams, InnerProductProof};
use curve25519_dalek::scalar::Scalar;
use tracing::{debug, instrument, trace};
use zkrp_core::{
    field::invert_checked, utils::inner_product, ChallengeTranscript, GroupElement, ZkResult,
};

/// Inner Product Argument prover
#[derive(Debug, Clone)]
pub struct InnerProductProver {
    params: InnerProductParams,
}

/// Vectors and commitment after the last folding round
struct Folded {
    a: Scalar,
    b: Scalar,
    g: GroupElement,
    h: GroupElement,
}

impl InnerProductProver {
    /// Create a new IPA prover with the given parameters
    pub fn new(params: InnerProductParams) -> Self {
        Self { params }
    }

    /// Create an inner product proof
    ///
    /// Proves knowledge of vectors `a` and `b` such that:
    /// `P = g^a * h^b * u^<a,b>`
    #[instrument(skip_all, fields(n = self.params.n))]
    pub fn prove<T: ChallengeTranscript>(
        &self,
        transcript: &mut T,
        a: &[Scalar],
        b: &[Scalar],
    ) -> ZkResult<InnerProductProof> {
        let params = &self.params;
        params.check_vectors(a, b)?;

        let p = params.commit(a, b)?;
        transcript.append_u64(b"n", params.n as u64);
        transcript.append_point(b"P", &p);

        let mut l_vec = Vec::new();
        let mut r_vec = Vec::new();
        let folded = compute_bip_recursive(
            transcript,
            a.to_vec(),
            b.to_vec(),
            params.g_vec.clone(),
            params.h_vec.clone(),
            &params.u,
            &mut l_vec,
            &mut r_vec,
        )?;
        debug!(rounds = l_vec.len(), "inner product proof created");

        Ok(InnerProductProof {
            n: params.n,
            l_vec,
            r_vec,
            u: params.u,
            p,
            g_final: folded.g,
            h_final: folded.h,
            a: folded.a,
            b: folded.b,
            params: params.clone(),
        })
    }
}

/// One folding round per call until the vectors have length 1
///
/// ```text
/// L  = g_R^{a_L} * h_L^{b_R} * u^{<a_L, b_R>}
/// R  = g_L^{a_R} * h_R^{b_L} * u^{<a_R, b_L>}
/// a' = a_L * x + a_R * x^{-1}     b' = b_L * x^{-1} + b_R * x
/// g' = g_L^{x^{-1}} * g_R^x       h' = h_L^x * h_R^{x^{-1}}
/// ```
#[allow(clippy::too_many_arguments)]
fn compute_bip_recursive<T: ChallengeTranscript>(
    transcript: &mut T,
    a: Vec<Scalar>,
    b: Vec<Scalar>,
    g: Vec<GroupElement>,
    h: Vec<GroupElement>,
    u: &GroupElement,
    l_vec: &mut Vec<GroupElement>,
    r_vec: &mut Vec<GroupElement>,
) -> ZkResult<Folded> {
    if a.len() == 1 {
        return Ok(Folded {
            a: a[0],
            b: b[0],
            g: g[0],
            h: h[0],
        });
    }

    let m = a.len() / 2;
    let (a_l, a_r) = a.split_at(m);
    let (b_l, b_r) = b.split_at(m);
    let (g_l, g_r) = g.split_at(m);
    let (h_l, h_r) = h.split_at(m);

    let c_l = inner_product(a_l, b_r)?;
    let c_r = inner_product(a_r, b_l)?;

    let l = GroupElement::multiscalar_mul(
        a_l.iter().chain(b_r.iter()).cloned().chain(std::iter::once(c_l)),
        g_r.iter().chain(h_l.iter()).chain(std::iter::once(u)).map(|p| p.0),
    );
    let r = GroupElement::multiscalar_mul(
        a_r.iter().chain(b_l.iter()).cloned().chain(std::iter::once(c_r)),
        g_l.iter().chain(h_r.iter()).chain(std::iter::once(u)).map(|p| p.0),
    );

    transcript.append_point(b"L", &l);
    transcript.append_point(b"R", &r);
    l_vec.push(l);
    r_vec.push(r);

    let x = transcript.challenge_scalar(b"x");
    let x_inv = invert_checked(&x)?;
    trace!(round = l_vec.len(), half = m, "folded");

    let folded_a = (0..m).map(|i| a_l[i] * x + a_r[i] * x_inv).collect();
    let folded_b = (0..m).map(|i| b_l[i] * x_inv + b_r[i] * x).collect();
    let folded_g = (0..m).map(|i| g_l[i] * x_inv + g_r[i] * x).collect();
    let folded_h = (0..m).map(|i| h_l[i] * x + h_r[i] * x_inv).collect();

    compute_bip_recursive(
        transcript, folded_a, folded_b, folded_g, folded_h, u, l_vec, r_vec,
    )
}
