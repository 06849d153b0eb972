//! Inner Product Argument proof structure

use crate::InnerProductParams;
use curve25519_dalek::scalar::Scalar;
use serde::{Deserialize, Serialize};
use zkrp_core::{
    field::{scalar_from_le_bytes, SCALAR_BYTES},
    utils::log2_exact,
    GroupElement, ZkError, ZkResult, POINT_BYTES,
};

/// Largest number of folding rounds [`InnerProductProof::from_bytes`] accepts.
///
/// Decoding re-derives `2n` generators, so `n` read off the wire is capped
/// at `2^MAX_DECODED_ROUNDS`.
pub const MAX_DECODED_ROUNDS: usize = 16;

/// An inner product argument proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerProductProof {
    /// Length of the committed vectors
    pub n: usize,
    /// L values from each folding round (log_2(n) elements)
    pub l_vec: Vec<GroupElement>,
    /// R values from each folding round (log_2(n) elements)
    pub r_vec: Vec<GroupElement>,
    /// Generator binding the inner product
    pub u: GroupElement,
    /// Commitment `g^a * h^b * u^<a,b>` the proof was made for
    pub p: GroupElement,
    /// `g` folded down to a single generator
    pub g_final: GroupElement,
    /// `h` folded down to a single generator
    pub h_final: GroupElement,
    /// Final scalar value a
    pub a: Scalar,
    /// Final scalar value b
    pub b: Scalar,
    /// Parameters the proof was made under
    pub params: InnerProductParams,
}

impl InnerProductProof {
    /// Get the number of folding rounds
    pub fn num_rounds(&self) -> usize {
        self.l_vec.len()
    }

    /// Validate proof structure
    pub fn validate_structure(&self) -> ZkResult<()> {
        let rounds = log2_exact(self.n)?;
        if self.l_vec.len() != rounds || self.r_vec.len() != rounds {
            return Err(ZkError::InvalidParams(format!(
                "expected {} folding rounds for n = {}, got {} L and {} R values",
                rounds,
                self.n,
                self.l_vec.len(),
                self.r_vec.len()
            )));
        }
        if self.params.n != self.n {
            return Err(ZkError::InvalidParams(format!(
                "proof for n = {} carries parameters for n = {}",
                self.n, self.params.n
            )));
        }
        Ok(())
    }

    /// Get proof size in bytes
    pub fn size_bytes(&self) -> usize {
        // n, L and R, u, P, g_final, h_final, a, b
        4 + (self.l_vec.len() + self.r_vec.len() + 4) * POINT_BYTES + 2 * SCALAR_BYTES
    }

    /// Serialize proof to bytes.
    ///
    /// Parameters are not encoded; [`InnerProductProof::from_bytes`]
    /// re-derives them from `n`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.size_bytes());

        result.extend_from_slice(&(self.n as u32).to_le_bytes());
        for point in self.l_vec.iter().chain(self.r_vec.iter()) {
            result.extend_from_slice(&point.to_bytes());
        }
        for point in [&self.u, &self.p, &self.g_final, &self.h_final] {
            result.extend_from_slice(&point.to_bytes());
        }
        result.extend_from_slice(self.a.as_bytes());
        result.extend_from_slice(self.b.as_bytes());

        result
    }

    /// Deserialize proof from bytes
    pub fn from_bytes(bytes: &[u8]) -> ZkResult<Self> {
        let n_bytes: [u8; 4] = bytes
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| ZkError::InvalidEncoding("insufficient bytes for proof".to_string()))?;
        let n = u32::from_le_bytes(n_bytes) as usize;
        let rounds = log2_exact(n)?;
        if rounds > MAX_DECODED_ROUNDS {
            return Err(ZkError::InvalidEncoding(format!(
                "vector length {} exceeds decodable maximum 2^{}",
                n, MAX_DECODED_ROUNDS
            )));
        }

        let expected_size = 4 + (2 * rounds + 4) * POINT_BYTES + 2 * SCALAR_BYTES;
        if bytes.len() != expected_size {
            return Err(ZkError::InvalidEncoding(format!(
                "invalid proof size: expected {}, got {}",
                expected_size,
                bytes.len()
            )));
        }

        let mut points = bytes[4..4 + (2 * rounds + 4) * POINT_BYTES]
            .chunks_exact(POINT_BYTES)
            .map(GroupElement::from_bytes)
            .collect::<ZkResult<Vec<_>>>()?
            .into_iter();
        let l_vec: Vec<_> = points.by_ref().take(rounds).collect();
        let r_vec: Vec<_> = points.by_ref().take(rounds).collect();
        let mut next_point = || {
            points
                .next()
                .ok_or_else(|| ZkError::InvalidEncoding("truncated proof".to_string()))
        };
        let u = next_point()?;
        let p = next_point()?;
        let g_final = next_point()?;
        let h_final = next_point()?;

        let scalars = &bytes[bytes.len() - 2 * SCALAR_BYTES..];
        let a = scalar_from_le_bytes(&scalars[..SCALAR_BYTES])?;
        let b = scalar_from_le_bytes(&scalars[SCALAR_BYTES..])?;

        Ok(Self {
            n,
            l_vec,
            r_vec,
            u,
            p,
            g_final,
            h_final,
            a,
            b,
            params: InnerProductParams::setup(n)?,
        })
    }
}
