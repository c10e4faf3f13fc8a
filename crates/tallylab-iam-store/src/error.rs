//! Error types for the store module.

use tallylab_iam_core::CoreError;
use thiserror::Error;

/// Errors that can occur during keystore and content store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No key is held for this identity id.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// No block is stored at this address.
    #[error("block not found: {0}")]
    NotFound(String),

    /// Block serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An address string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The backing store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A lock guarding in-memory state was poisoned.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
