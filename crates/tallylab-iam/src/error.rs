//! Error types for TallyLab IAM.

use tallylab_iam_access::AccessError;
use tallylab_iam_core::{CoreError, VerificationError};
use tallylab_iam_store::StoreError;
use thiserror::Error;

/// Errors that can occur during identity and access operations.
#[derive(Debug, Error)]
pub enum IamError {
    /// Key material or encoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Identity could not be verified at all.
    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    /// Keystore or content store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Manifest or policy error.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// The access controller denied an append.
    #[error("append denied for {id} on {resource}")]
    AppendDenied { resource: String, id: String },

    /// A provider or controller type other than TallyLab's was requested.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Options do not describe a complete operation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A freshly assembled identity failed its own verification.
    #[error("identity does not verify: {0}")]
    InvalidIdentity(String),

    /// A lock guarding in-memory state was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

/// Result type for TallyLab IAM operations.
pub type Result<T> = std::result::Result<T, IamError>;
