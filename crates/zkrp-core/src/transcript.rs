//! Transcript management for Fiat-Shamir heuristic
//!
//! Two interchangeable transcript hashes back every proof:
//!
//! - [`merlin::Transcript`], a STROBE based duplex construction
//! - [`HashTranscript`], the ordered concatenation of all appended bytes fed
//!   through one cryptographic hash (SHA-256 for [`Sha256Transcript`])
//!
//! A single proof always uses one of them from start to finish; prover and
//! verifier must append the same values in the same order.

use crate::GroupElement;
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use sha2::{digest::Digest, Sha256};

/// Operations the sigma and range protocols need from a transcript
pub trait ChallengeTranscript {
    /// Append a group element to the transcript
    fn append_point(&mut self, label: &'static [u8], point: &GroupElement);

    /// Append a scalar to the transcript
    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar);

    /// Append a length or index
    fn append_u64(&mut self, label: &'static [u8], value: u64);

    /// Challenge scalar from transcript
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar;
}

impl ChallengeTranscript for Transcript {
    fn append_point(&mut self, label: &'static [u8], point: &GroupElement) {
        self.append_message(label, point.compress().as_bytes());
    }

    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar) {
        self.append_message(label, scalar.as_bytes());
    }

    fn append_u64(&mut self, label: &'static [u8], value: u64) {
        Transcript::append_u64(self, label, value);
    }

    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        let mut buf = [0u8; 64];
        self.challenge_bytes(label, &mut buf);
        Scalar::from_bytes_mod_order_wide(&buf)
    }
}

/// Transcript that hashes the ordered concatenation of everything appended.
///
/// Labels are not hashed; only values are, in append order. Drawing a
/// challenge hashes the buffer and then appends the digest, so a second
/// challenge depends on the first.
#[derive(Debug, Clone)]
pub struct HashTranscript<D: Digest + Clone> {
    hasher: D,
}

/// SHA-256 instance of [`HashTranscript`]
pub type Sha256Transcript = HashTranscript<Sha256>;

impl<D: Digest + Clone> HashTranscript<D> {
    /// Create an empty transcript bound to a domain label
    pub fn new(domain_label: &'static [u8]) -> Self {
        let mut hasher = D::new();
        hasher.update(domain_label);
        Self { hasher }
    }

    /// Append raw bytes
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Hash everything appended so far and chain the digest back in
    pub fn challenge_bytes(&mut self) -> Vec<u8> {
        let digest = self.hasher.clone().finalize().to_vec();
        self.hasher.update(&digest);
        digest
    }
}

impl<D: Digest + Clone> ChallengeTranscript for HashTranscript<D> {
    fn append_point(&mut self, _label: &'static [u8], point: &GroupElement) {
        self.hasher.update(point.to_bytes());
    }

    fn append_scalar(&mut self, _label: &'static [u8], scalar: &Scalar) {
        self.hasher.update(scalar.as_bytes());
    }

    fn append_u64(&mut self, _label: &'static [u8], value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    fn challenge_scalar(&mut self, _label: &'static [u8]) -> Scalar {
        let digest = self.challenge_bytes();
        let mut wide = [0u8; 64];
        let len = digest.len().min(64);
        wide[..len].copy_from_slice(&digest[..len]);
        Scalar::from_bytes_mod_order_wide(&wide)
    }
}

/// Create a new merlin transcript with domain separation
pub fn proof_transcript(domain_label: &'static [u8]) -> Transcript {
    let mut transcript = Transcript::new(b"zkrp");
    transcript.append_message(b"domain", domain_label);
    transcript
}
