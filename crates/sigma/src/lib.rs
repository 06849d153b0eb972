//! # Sigma Protocols
//!
//! Three-move (commit, challenge, response) proofs over Pedersen
//! commitments, made non-interactive with the Fiat-Shamir transform:
//!
//! - [`binary`]: a committed value is a bit
//! - [`same_value`]: two commitments hide the same value
//!
//! Every protocol exposes its commit and respond moves separately so that
//! callers can derive one challenge for many sub-proofs, and is generic over
//! the [`zkrp_core::ChallengeTranscript`] in use.

pub mod binary;
pub mod same_value;

pub use binary::*;
pub use same_value::*;
