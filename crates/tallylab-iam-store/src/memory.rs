//! In-memory implementations of the collaborator traits.
//!
//! These are primarily for testing and embedding. All data is lost when the
//! store is dropped. Thread-safe via RwLock.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tallylab_iam_core::{Cid, Ed25519PublicKey, Ed25519Signature, Keypair};

use crate::error::{Result, StoreError};
use crate::traits::{ContentStore, Keystore};

/// In-memory host keystore.
pub struct MemoryKeystore {
    keys: RwLock<HashMap<String, Keypair>>,
}

impl MemoryKeystore {
    /// Create a new empty keystore.
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Forget the key for `id`. Returns whether a key was held.
    pub fn remove_key(&self, id: &str) -> Result<bool> {
        let mut keys = self.keys.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(keys.remove(id).is_some())
    }

    /// Number of keys held.
    pub fn len(&self) -> Result<usize> {
        let keys = self.keys.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(keys.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryKeystore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Keystore for MemoryKeystore {
    async fn has_key(&self, id: &str) -> Result<bool> {
        let keys = self.keys.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(keys.contains_key(id))
    }

    async fn get_key(&self, id: &str) -> Result<Option<Ed25519PublicKey>> {
        let keys = self.keys.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(keys.get(id).map(|kp| kp.public_key()))
    }

    async fn create_key(&self, id: &str) -> Result<Ed25519PublicKey> {
        let mut keys = self.keys.write().map_err(|_| StoreError::LockPoisoned)?;
        let keypair = keys.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(id, "creating host key");
            Keypair::generate()
        });
        Ok(keypair.public_key())
    }

    async fn sign(&self, id: &str, data: &[u8]) -> Result<Ed25519Signature> {
        let keys = self.keys.read().map_err(|_| StoreError::LockPoisoned)?;
        let keypair = keys
            .get(id)
            .ok_or_else(|| StoreError::KeyNotFound(id.to_string()))?;
        Ok(keypair.sign(data))
    }
}

/// In-memory content-addressed block store.
pub struct MemoryContentStore {
    blocks: RwLock<HashMap<Cid, Vec<u8>>>,
}

impl MemoryContentStore {
    /// Create a new empty block store.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blocks stored.
    pub fn len(&self) -> Result<usize> {
        let blocks = self.blocks.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(blocks.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, bytes: &[u8]) -> Result<Cid> {
        let cid = Cid::for_bytes(bytes);
        let mut blocks = self.blocks.write().map_err(|_| StoreError::LockPoisoned)?;
        blocks.entry(cid).or_insert_with(|| bytes.to_vec());
        Ok(cid)
    }

    async fn get(&self, cid: &Cid) -> Result<Option<Vec<u8>>> {
        let blocks = self.blocks.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(blocks.get(cid).cloned())
    }
}
