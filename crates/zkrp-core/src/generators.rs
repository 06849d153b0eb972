//! Protocol generators derived deterministically from seed strings
//!
//! `g` is the Ristretto base point. Every other generator is produced by
//! [`GroupElement::hash_to_group`] from a fixed seed so nobody knows a
//! discrete log relation between them. The standard set is computed once per
//! process and shared read-only afterwards.

use crate::{GroupElement, ZkError, ZkResult};
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use once_cell::sync::Lazy;

/// Seed for the blinding generator `h`
pub const SEED_H: &[u8] = b"zkrp_pedersen_h";

/// Seed for the inner product generator `u`
pub const SEED_U: &[u8] = b"zkrp_inner_product_u";

/// Seed prefix for the vector generators `g_i`
pub const SEED_G_VEC: &str = "zkrp_vector_g_";

/// Seed prefix for the vector generators `h_i`
pub const SEED_H_VEC: &str = "zkrp_vector_h_";

static STANDARD: Lazy<ProtocolGenerators> = Lazy::new(|| ProtocolGenerators {
    g: GroupElement::from(RISTRETTO_BASEPOINT_POINT),
    h: GroupElement::hash_to_group(SEED_H),
    u: GroupElement::hash_to_group(SEED_U),
});

/// Generator triple shared by the commitment and proof layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolGenerators {
    /// Value generator `g`
    pub g: GroupElement,
    /// Blinding generator `h`
    pub h: GroupElement,
    /// Generator for inner product terms
    pub u: GroupElement,
}

impl ProtocolGenerators {
    /// The process-wide standard generators
    pub fn standard() -> &'static ProtocolGenerators {
        &STANDARD
    }

    /// Derive all three generators from caller supplied seeds
    pub fn from_seeds(seed_g: &[u8], seed_h: &[u8], seed_u: &[u8]) -> ZkResult<Self> {
        if seed_g == seed_h || seed_g == seed_u || seed_h == seed_u {
            return Err(ZkError::InvalidParams(
                "generator seeds must be distinct".to_string(),
            ));
        }
        Ok(Self {
            g: GroupElement::hash_to_group(seed_g),
            h: GroupElement::hash_to_group(seed_h),
            u: GroupElement::hash_to_group(seed_u),
        })
    }
}

/// Derive `n` generators `hash_to_group(prefix || i)`
pub fn vector_generators(prefix: &str, n: usize) -> Vec<GroupElement> {
    (0..n)
        .map(|i| GroupElement::hash_to_group(format!("{}{}", prefix, i).as_bytes()))
        .collect()
}
