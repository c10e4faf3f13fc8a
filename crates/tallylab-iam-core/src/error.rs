//! Error types for TallyLab IAM core.

use thiserror::Error;

/// Core errors that can occur during key and identity operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("seed must be exactly 32 bytes, got {0}")]
    InvalidSeedLength(usize),

    #[error("key material has no signing private key")]
    MissingSigningKey,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("unsupported security version: {0}")]
    UnsupportedVersion(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Malformed input encountered while verifying an identity.
///
/// Kept apart from a plain `Ok(false)`: these mean the identity could not be
/// checked at all, not that a well-formed signature failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("malformed identity id: {0}")]
    MalformedId(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
