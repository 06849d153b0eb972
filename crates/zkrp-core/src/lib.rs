//! # Range Proof Core
//!
//! Foundational types shared by the sigma, range and inner product crates:
//!
//! - Scalar field arithmetic modulo the Ristretto group order
//! - Group elements, canonical encodings and hash-to-group
//! - Deterministic protocol generators
//! - Transcript management for Fiat-Shamir transforms
//! - Pedersen commitments
//! - Error types and vector utilities
//!
//! ## Mathematical Background
//!
//! Everything operates in the prime-order Ristretto group with generators:
//! - `g`: value generator
//! - `h`: blinding generator
//! - `u`: inner product generator
//! - `{g_i}`, `{h_i}`: vector generators for the inner product argument
//!
//! A Pedersen commitment to `v` with blinding `r` is
//! ```text
//! C = g^v * h^r
//! ```

pub mod errors;
pub mod field;
pub mod generators;
pub mod group;
pub mod pedersen;
pub mod transcript;
pub mod utils;

pub use errors::*;
pub use generators::*;
pub use group::*;
pub use transcript::*;

/// Re-export commonly used types from curve25519-dalek
pub use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};

/// Re-export merlin transcript
pub use merlin::Transcript;
