//! # Range Proofs
//!
//! This crate implements range proofs over Pedersen commitments. Range proofs
//! allow proving that a committed value lies within `[0, 2^n)` without
//! revealing the actual value.
//!
//! ## Mathematical Background
//!
//! Both assemblies start from the bit decomposition `v = Σ(b_i * 2^i)` with
//! `b_i ∈ {0,1}` and prove every bit separately:
//!
//! - [`commit_range`]: one sigma binary proof per bit commitment, plus a
//!   same-value proof linking `Π A_i^{2^i}` back to the value commitment.
//!   Any width up to [`commit_range::MAX_BITS`], single-threaded.
//! - [`ctrange`]: a two-member ring proof per bit for exactly 32 bits,
//!   built by 32 parallel tasks in two phases, with a fixed 3200-byte
//!   encoding.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use range::ctrange::RangeProof;
//! use zkrp_core::ProtocolGenerators;
//!
//! // Prove that value 42 is in range [0, 2^32)
//! let gens = ProtocolGenerators::standard();
//! let (_blind, proof) = RangeProof::prove(42, &gens.g, &gens.h).unwrap();
//!
//! let encoded = proof.to_string();
//! let decoded: RangeProof = encoded.parse().unwrap();
//! assert!(decoded.verify().unwrap());
//! ```

pub mod commit_range;
pub mod ctrange;
