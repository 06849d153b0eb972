//! Vector utilities shared by the range and inner product provers

use crate::{ZkError, ZkResult};
use curve25519_dalek::scalar::Scalar;

/// Compute the inner product of two scalar vectors
pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> ZkResult<Scalar> {
    if a.len() != b.len() {
        return Err(ZkError::VectorLengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(ai, bi)| ai * bi).sum())
}

/// Check if a number is a power of 2
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// `log2(n)` for a power of two `n`
pub fn log2_exact(n: usize) -> ZkResult<usize> {
    if !is_power_of_two(n) {
        return Err(ZkError::NotPowerOfTwo(n));
    }
    Ok(n.trailing_zeros() as usize)
}
