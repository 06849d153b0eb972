//! Pedersen commitments
//!
//! A commitment to `value` with blinding factor `blind` is
//! `C = value·g + blind·h` (written multiplicatively `g^value · h^blind`).
//! It is perfectly hiding and computationally binding as long as nobody
//! knows `log_g(h)`.

use crate::{field, GroupElement, ZkError, ZkResult};
use curve25519_dalek::scalar::Scalar;
use num_bigint::BigInt;

fn check_generators(g: &GroupElement, h: &GroupElement) -> ZkResult<()> {
    if g.is_identity() || h.is_identity() {
        return Err(ZkError::InvalidParams(
            "commitment generators must not be the identity".to_string(),
        ));
    }
    Ok(())
}

/// `Commit(value, blind, g, h) = value·g + blind·h`
pub fn commit(
    value: &Scalar,
    blind: &Scalar,
    g: &GroupElement,
    h: &GroupElement,
) -> ZkResult<GroupElement> {
    check_generators(g, h)?;
    Ok(GroupElement::multiscalar_mul([*value, *blind], [g.0, h.0]))
}

/// Commit to an arbitrary precision integer, reduced modulo the group order
pub fn commit_bigint(
    value: &BigInt,
    blind: &Scalar,
    g: &GroupElement,
    h: &GroupElement,
) -> ZkResult<GroupElement> {
    commit(&field::scalar_from_bigint(value), blind, g, h)
}

/// Check that `c` opens to `(value, blind)`.
///
/// A mismatch is `Ok(false)`; only malformed generators are errors.
pub fn open(
    c: &GroupElement,
    value: &Scalar,
    blind: &Scalar,
    g: &GroupElement,
    h: &GroupElement,
) -> ZkResult<bool> {
    let expected = commit(value, blind, g, h)?;
    Ok(bool::from(expected.ct_eq(c)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProtocolGenerators;
    use rand::rngs::OsRng;

    #[test]
    fn test_commit_open() {
        let gens = ProtocolGenerators::standard();
        let value = Scalar::from(42u64);
        let blind = Scalar::random(&mut OsRng);

        let c = commit(&value, &blind, &gens.g, &gens.h).unwrap();
        assert!(open(&c, &value, &blind, &gens.g, &gens.h).unwrap());
        assert!(!open(&c, &Scalar::from(43u64), &blind, &gens.g, &gens.h).unwrap());
        assert!(!open(&c, &value, &(blind + Scalar::ONE), &gens.g, &gens.h).unwrap());
    }

    #[test]
    fn test_identity_generator_rejected() {
        let gens = ProtocolGenerators::standard();
        let id = GroupElement::identity();
        let one = Scalar::ONE;
        assert!(matches!(commit(&one, &one, &id, &gens.h), Err(ZkError::InvalidParams(_))));
        assert!(matches!(commit(&one, &one, &gens.g, &id), Err(ZkError::InvalidParams(_))));
        assert!(open(&gens.g, &one, &one, &id, &gens.h).is_err());
    }

    #[test]
    fn test_homomorphism() {
        let gens = ProtocolGenerators::standard();
        let (v1, r1) = (Scalar::from(10u64), Scalar::random(&mut OsRng));
        let (v2, r2) = (Scalar::from(32u64), Scalar::random(&mut OsRng));
        let c1 = commit(&v1, &r1, &gens.g, &gens.h).unwrap();
        let c2 = commit(&v2, &r2, &gens.g, &gens.h).unwrap();
        assert!(open(&(c1 + c2), &(v1 + v2), &(r1 + r2), &gens.g, &gens.h).unwrap());
    }

    #[test]
    fn test_negative_bigint_wraps() {
        let gens = ProtocolGenerators::standard();
        let blind = Scalar::random(&mut OsRng);
        let c = commit_bigint(&BigInt::from(-3), &blind, &gens.g, &gens.h).unwrap();
        assert!(open(&c, &-Scalar::from(3u64), &blind, &gens.g, &gens.h).unwrap());
    }
}
