//! Group operations and point utilities

use crate::{ZkError, ZkResult};
use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::{Identity, IsIdentity, VartimeMultiscalarMul},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use subtle::{Choice, ConstantTimeEq};

/// Length of a canonical point encoding
pub const POINT_BYTES: usize = 32;

/// A point on the Ristretto group with additional utility methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupElement(pub RistrettoPoint);

impl GroupElement {
    /// Identity element
    pub fn identity() -> Self {
        Self(RistrettoPoint::identity())
    }

    /// Whether this is the identity ("zero point")
    pub fn is_identity(&self) -> bool {
        self.0.is_identity()
    }

    /// `scalar * B` for the Ristretto base point
    pub fn mul_base(scalar: &Scalar) -> Self {
        Self(RistrettoPoint::mul_base(scalar))
    }

    /// Map a seed string to a point with no known discrete log relation
    /// to any other generator.
    pub fn hash_to_group(seed: &[u8]) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(b"zkrp_hash_to_group_");
        hasher.update(seed);
        let wide: [u8; 64] = hasher.finalize().into();
        Self(RistrettoPoint::from_uniform_bytes(&wide))
    }

    /// Create from compressed point
    pub fn from_compressed(compressed: &CompressedRistretto) -> ZkResult<Self> {
        compressed
            .decompress()
            .map(Self)
            .ok_or_else(|| ZkError::InvalidEncoding("Invalid compressed point".to_string()))
    }

    /// Decode a canonical 32-byte encoding, rejecting anything off the group
    pub fn from_bytes(bytes: &[u8]) -> ZkResult<Self> {
        let compressed = CompressedRistretto::from_slice(bytes).map_err(|_| {
            ZkError::InvalidEncoding(format!("point must be {} bytes, got {}", POINT_BYTES, bytes.len()))
        })?;
        Self::from_compressed(&compressed)
    }

    /// Canonical 32-byte encoding
    pub fn to_bytes(&self) -> [u8; POINT_BYTES] {
        self.0.compress().to_bytes()
    }

    /// Compress this point
    pub fn compress(&self) -> CompressedRistretto {
        self.0.compress()
    }

    /// Perform multi-scalar multiplication
    pub fn multiscalar_mul<I, J>(scalars: I, points: J) -> Self
    where
        I: IntoIterator<Item = Scalar>,
        J: IntoIterator<Item = RistrettoPoint>,
    {
        Self(RistrettoPoint::vartime_multiscalar_mul(scalars, points))
    }

    /// Constant-time equality, used to fold verification checks without
    /// branching on intermediate results.
    pub fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl std::ops::Add for GroupElement {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::ops::AddAssign for GroupElement {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::ops::Sub for GroupElement {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl std::ops::Mul<Scalar> for GroupElement {
    type Output = Self;

    fn mul(self, scalar: Scalar) -> Self {
        Self(self.0 * scalar)
    }
}

impl std::ops::Mul<&Scalar> for GroupElement {
    type Output = Self;

    fn mul(self, scalar: &Scalar) -> Self {
        Self(self.0 * scalar)
    }
}

impl std::ops::Neg for GroupElement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for GroupElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::identity(), |acc, p| acc + p)
    }
}

impl From<RistrettoPoint> for GroupElement {
    fn from(point: RistrettoPoint) -> Self {
        Self(point)
    }
}

impl From<GroupElement> for RistrettoPoint {
    fn from(element: GroupElement) -> Self {
        element.0
    }
}
