//! Collaborator traits: the host keystore and the content-addressed block store.
//!
//! Both are owned by the host system. TallyLab IAM only consumes them, so
//! the traits stay minimal and implementations decide persistence.

use async_trait::async_trait;
use tallylab_iam_core::{Cid, Ed25519PublicKey, Ed25519Signature};

use crate::error::Result;

/// The host keystore: one host keypair per identity id.
///
/// Implementations must be safe for concurrent reads; access decisions call
/// [`Keystore::has_key`] from many tasks at once.
#[async_trait]
pub trait Keystore: Send + Sync {
    /// Whether a live private key is held for `id`.
    async fn has_key(&self, id: &str) -> Result<bool>;

    /// Public key for `id`, if held.
    async fn get_key(&self, id: &str) -> Result<Option<Ed25519PublicKey>>;

    /// Create a keypair for `id`, returning its public key.
    ///
    /// Creating a key that already exists returns the existing public key.
    async fn create_key(&self, id: &str) -> Result<Ed25519PublicKey>;

    /// Sign `data` with the private key held for `id`.
    ///
    /// Fails with `KeyNotFound` if no key is held.
    async fn sign(&self, id: &str, data: &[u8]) -> Result<Ed25519Signature>;
}

/// The content-addressed block store.
///
/// Blocks are canonical CBOR bytes addressed by [`Cid::for_bytes`].
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a block, returning its address.
    ///
    /// Putting the same bytes twice returns the same address.
    async fn put(&self, bytes: &[u8]) -> Result<Cid>;

    /// Fetch a block by address.
    async fn get(&self, cid: &Cid) -> Result<Option<Vec<u8>>>;

    /// Check if a block exists.
    async fn has(&self, cid: &Cid) -> Result<bool> {
        Ok(self.get(cid).await?.is_some())
    }
}
