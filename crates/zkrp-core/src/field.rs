//! Scalar field arithmetic
//!
//! All exponents live in the scalar field of the Ristretto group, i.e. the
//! integers modulo the group order
//! `ℓ = 2^252 + 27742317777372353535851937790883648493`.
//! `curve25519_dalek::Scalar` keeps every value canonical (`< ℓ`), so add,
//! sub, mul and inverse are reduced after every operation.
//!
//! Callers hand in arbitrary precision integers ([`BigInt`]) which are
//! reduced here. A second public modulus [`Q`] bounds the size of the
//! aggregate challenge of the concurrent range proof.

use crate::{ZkError, ZkResult};
use curve25519_dalek::scalar::Scalar;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

/// Length of a canonical scalar encoding
pub const SCALAR_BYTES: usize = 32;

/// Order of the Ristretto group, read off `-1 mod ℓ`
pub static ORDER: Lazy<BigUint> =
    Lazy::new(|| BigUint::from_bytes_le(&(-Scalar::ONE).to_bytes()) + BigUint::one());

/// Public field modulus `2^255 - 19` used to bound aggregate challenges
pub static Q: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << 255u32) - BigUint::from(19u32));

/// Reduce an arbitrary (possibly negative) integer modulo the group order
pub fn scalar_from_bigint(value: &BigInt) -> Scalar {
    let order = BigInt::from_biguint(Sign::Plus, ORDER.clone());
    let mut reduced = value % &order;
    if reduced.sign() == Sign::Minus {
        reduced += &order;
    }
    // Non-negative and below the order after the correction above.
    let magnitude = reduced.magnitude();
    scalar_from_biguint_canonical(magnitude)
}

/// Reduce a non-negative integer modulo the group order
pub fn scalar_from_biguint(value: &BigUint) -> Scalar {
    let reduced = value % &*ORDER;
    scalar_from_biguint_canonical(&reduced)
}

fn scalar_from_biguint_canonical(value: &BigUint) -> Scalar {
    let mut bytes = [0u8; SCALAR_BYTES];
    let le = value.to_bytes_le();
    bytes[..le.len()].copy_from_slice(&le);
    Scalar::from_bytes_mod_order(bytes)
}

/// Inverse that refuses to divide by zero
pub fn invert_checked(x: &Scalar) -> ZkResult<Scalar> {
    if *x == Scalar::ZERO {
        return Err(ZkError::ZeroChallenge);
    }
    Ok(x.invert())
}

/// Reduce big-endian bytes modulo [`Q`]
pub fn reduce_mod_q(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes) % &*Q
}

/// Fixed width big-endian encoding; `None` if the value does not fit
pub fn biguint_to_be_fixed(value: &BigUint) -> Option<[u8; SCALAR_BYTES]> {
    let be = value.to_bytes_be();
    if be.len() > SCALAR_BYTES {
        return None;
    }
    let mut out = [0u8; SCALAR_BYTES];
    out[SCALAR_BYTES - be.len()..].copy_from_slice(&be);
    Some(out)
}

/// Big-endian fixed width encoding of a canonical scalar
pub fn scalar_to_be_bytes(scalar: &Scalar) -> [u8; SCALAR_BYTES] {
    let mut bytes = scalar.to_bytes();
    bytes.reverse();
    bytes
}

/// Decode a big-endian scalar, rejecting values that are not below the order
pub fn scalar_from_be_bytes(bytes: &[u8]) -> ZkResult<Scalar> {
    let mut le: [u8; SCALAR_BYTES] = bytes.try_into().map_err(|_| {
        ZkError::InvalidEncoding(format!("scalar must be {} bytes, got {}", SCALAR_BYTES, bytes.len()))
    })?;
    le.reverse();
    Option::from(Scalar::from_canonical_bytes(le))
        .ok_or_else(|| ZkError::InvalidEncoding("non-canonical scalar".to_string()))
}

/// Decode a little-endian scalar, rejecting values that are not below the order
pub fn scalar_from_le_bytes(bytes: &[u8]) -> ZkResult<Scalar> {
    let le: [u8; SCALAR_BYTES] = bytes.try_into().map_err(|_| {
        ZkError::InvalidEncoding(format!("scalar must be {} bytes, got {}", SCALAR_BYTES, bytes.len()))
    })?;
    Option::from(Scalar::from_canonical_bytes(le))
        .ok_or_else(|| ZkError::InvalidEncoding("non-canonical scalar".to_string()))
}

/// Little-endian base-2 decomposition of a non-negative integer into `bits`
/// digits. Digits above `bits` are ignored; range checks belong to callers.
pub fn bits_le(value: &BigUint, bits: usize) -> Vec<u8> {
    (0..bits)
        .map(|i| if value.bit(i as u64) { 1u8 } else { 0u8 })
        .collect()
}

/// Whether `0 <= value < 2^bits`
pub fn in_range(value: &BigInt, bits: usize) -> bool {
    value.sign() != Sign::Minus && (value.is_zero() || value.bits() <= bits as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_dalek() {
        // ℓ - 1 reduces to -1
        let order_minus_one = &*ORDER - BigUint::one();
        assert_eq!(scalar_from_biguint(&order_minus_one), -Scalar::ONE);
        assert_eq!(scalar_from_biguint(&ORDER), Scalar::ZERO);
    }

    #[test]
    fn test_order_value() {
        let tail = BigUint::parse_bytes(b"27742317777372353535851937790883648493", 10).unwrap();
        assert_eq!(*ORDER, (BigUint::one() << 252u32) + tail);
        assert!(!ORDER.is_zero());
    }

    #[test]
    fn test_negative_reduction() {
        assert_eq!(scalar_from_bigint(&BigInt::from(-1)), -Scalar::ONE);
        assert_eq!(scalar_from_bigint(&BigInt::from(-5)), -Scalar::from(5u64));
        assert_eq!(scalar_from_bigint(&BigInt::from(42)), Scalar::from(42u64));
    }

    #[test]
    fn test_invert_checked() {
        assert_eq!(invert_checked(&Scalar::ZERO), Err(ZkError::ZeroChallenge));
        let x = Scalar::from(7u64);
        assert_eq!(invert_checked(&x).unwrap() * x, Scalar::ONE);
    }

    #[test]
    fn test_be_roundtrip() {
        let x = Scalar::from(0x0102_0304u64);
        let be = scalar_to_be_bytes(&x);
        assert_eq!(&be[28..], &[1, 2, 3, 4]);
        assert_eq!(scalar_from_be_bytes(&be).unwrap(), x);
    }

    #[test]
    fn test_be_rejects_non_canonical() {
        assert!(scalar_from_be_bytes(&[0xffu8; 32]).is_err());
        assert!(scalar_from_be_bytes(&[0u8; 31]).is_err());
    }

    #[test]
    fn test_mod_q() {
        let q_bytes = biguint_to_be_fixed(&Q).unwrap();
        assert!(reduce_mod_q(&q_bytes).is_zero());
        assert_eq!(reduce_mod_q(&[0x05]), BigUint::from(5u32));
    }

    proptest::proptest! {
        #[test]
        fn prop_bigint_reduction_is_a_ring_map(a in proptest::num::i64::ANY, b in proptest::num::i64::ANY) {
            let (x, y) = (BigInt::from(a), BigInt::from(b));
            let sum = scalar_from_bigint(&(&x + &y));
            let product = scalar_from_bigint(&(&x * &y));
            proptest::prop_assert_eq!(sum, scalar_from_bigint(&x) + scalar_from_bigint(&y));
            proptest::prop_assert_eq!(product, scalar_from_bigint(&x) * scalar_from_bigint(&y));
        }

        #[test]
        fn prop_bits_recompose(v in proptest::num::u64::ANY) {
            let bits = bits_le(&BigUint::from(v), 64);
            let recomposed = bits.iter().enumerate().fold(0u64, |acc, (i, b)| acc | ((*b as u64) << i));
            proptest::prop_assert_eq!(recomposed, v);
        }
    }

    #[test]
    fn test_bits_and_range() {
        assert_eq!(bits_le(&BigUint::from(13u32), 6), vec![1, 0, 1, 1, 0, 0]);
        assert!(in_range(&BigInt::from(0), 1));
        assert!(in_range(&BigInt::from(255), 8));
        assert!(!in_range(&BigInt::from(256), 8));
        assert!(!in_range(&BigInt::from(-1), 8));
    }
}
