//! Error types for commitment and range proof operations

use thiserror::Error;

/// Main error type shared by every proof crate in the workspace
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZkError {
    /// Malformed commitment or generator parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Malformed input to the binary (bit) proof
    #[error("Invalid binary proof parameters: {0}")]
    InvalidBinaryParams(String),

    /// Malformed input to the same-value proof
    #[error("Invalid same-value proof parameters: {0}")]
    InvalidSameValueParams(String),

    /// Malformed range proof or range proof parameters
    #[error("Invalid range proof parameters: {0}")]
    InvalidRangeParams(String),

    /// Value outside of the provable interval
    #[error("Value is not in range [0, 2^{bits})")]
    ValueOutOfRange { bits: usize },

    /// Vector length mismatch
    #[error("Vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },

    /// Vector length that must be a power of two is not
    #[error("Length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// A Fiat-Shamir challenge came out as zero and cannot be inverted
    #[error("Fiat-Shamir challenge is zero")]
    ZeroChallenge,

    /// Bytes or strings that do not decode to a proof
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A worker task of the concurrent range prover failed
    #[error("Proof construction failed: {0}")]
    ConstructionFailed(String),
}

/// Result type for proof operations
pub type ZkResult<T> = Result<T, ZkError>;
