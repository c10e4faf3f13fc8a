//! # TallyLab IAM Store
//!
//! Interfaces to the host collaborators TallyLab IAM depends on, with
//! in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Keystore`] - Host keypairs, one per identity id
//! - [`ContentStore`] - Content-addressed blocks for manifests
//! - [`MemoryKeystore`] / [`MemoryContentStore`] - In-memory implementations
//!
//! ## Design Notes
//!
//! - **Idempotent puts**: storing the same bytes twice returns the same address
//! - **Idempotent key creation**: creating an existing key returns it unchanged
//! - **No retries**: collaborator failures surface to the caller as-is

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{MemoryContentStore, MemoryKeystore};
pub use traits::{ContentStore, Keystore};
