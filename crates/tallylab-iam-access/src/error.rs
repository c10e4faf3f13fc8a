//! Error types for the access module.

use tallylab_iam_core::CoreError;
use tallylab_iam_store::StoreError;
use thiserror::Error;

/// Errors that can occur while persisting policies or deciding appends.
///
/// A denied append is not an error; see [`crate::can_append`].
#[derive(Debug, Error)]
pub enum AccessError {
    /// A manifest decoded but does not describe a TallyLab access controller.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// No manifest is stored at the address.
    #[error("manifest not found: {0}")]
    ManifestNotFound(String),

    /// Keystore or content store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for access operations.
pub type Result<T> = std::result::Result<T, AccessError>;
