//! Public parameters of the inner product argument

use serde::{Deserialize, Serialize};
use zkrp_core::{
    utils::{inner_product, is_power_of_two},
    vector_generators, GroupElement, ProtocolGenerators, Scalar, ZkError, ZkResult, SEED_G_VEC,
    SEED_H_VEC,
};

/// Generators for vectors of length `n`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerProductParams {
    /// Vector length, a power of two
    pub n: usize,
    /// `g_0 .. g_{n-1}`
    pub g_vec: Vec<GroupElement>,
    /// `h_0 .. h_{n-1}`
    pub h_vec: Vec<GroupElement>,
    /// Generator binding the inner product
    pub u: GroupElement,
}

impl InnerProductParams {
    /// Derive parameters for vectors of length `n`
    pub fn setup(n: usize) -> ZkResult<Self> {
        if n == 0 {
            return Err(ZkError::InvalidParams(
                "vector length must be positive".to_string(),
            ));
        }
        if !is_power_of_two(n) {
            return Err(ZkError::NotPowerOfTwo(n));
        }

        Ok(Self {
            n,
            g_vec: vector_generators(SEED_G_VEC, n),
            h_vec: vector_generators(SEED_H_VEC, n),
            u: ProtocolGenerators::standard().u,
        })
    }

    /// `P = g^a * h^b * u^<a,b>`
    pub fn commit(&self, a: &[Scalar], b: &[Scalar]) -> ZkResult<GroupElement> {
        self.check_vectors(a, b)?;
        let c = inner_product(a, b)?;

        let scalars = a.iter().chain(b.iter()).cloned().chain(std::iter::once(c));
        let points = self
            .g_vec
            .iter()
            .chain(self.h_vec.iter())
            .chain(std::iter::once(&self.u))
            .map(|p| p.0);
        Ok(GroupElement::multiscalar_mul(scalars, points))
    }

    pub(crate) fn check_vectors(&self, a: &[Scalar], b: &[Scalar]) -> ZkResult<()> {
        if a.len() != b.len() {
            return Err(ZkError::VectorLengthMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        if a.len() != self.n {
            return Err(ZkError::VectorLengthMismatch {
                expected: self.n,
                actual: a.len(),
            });
        }
        Ok(())
    }
}
