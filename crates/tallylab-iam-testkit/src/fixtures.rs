//! Test fixtures and helpers.
//!
//! Common setup code for identity and access tests.

use std::sync::Arc;

use tallylab_iam_access::{AccessPolicy, Entry};
use tallylab_iam_core::{identity_signing_message, sign_identity, Identity, KeyMaterial};
use tallylab_iam_store::{Keystore, MemoryContentStore, MemoryKeystore};

/// Key material, a keystore holding its host key, and the identity binding them.
pub struct TestFixture {
    pub key_material: KeyMaterial,
    pub keystore: Arc<MemoryKeystore>,
    pub content_store: MemoryContentStore,
    pub identity: Identity,
}

impl TestFixture {
    /// Create a fixture with random key material.
    pub async fn new() -> Self {
        let key_material = KeyMaterial::derive(None).expect("random key derivation");
        Self::with_key_material(key_material).await
    }

    /// Create a fixture with key material derived from `seed`.
    pub async fn with_seed(seed: [u8; 32]) -> Self {
        let key_material = KeyMaterial::derive(Some(&seed[..])).expect("seeded key derivation");
        Self::with_key_material(key_material).await
    }

    /// Create a fixture around existing key material.
    pub async fn with_key_material(key_material: KeyMaterial) -> Self {
        let keystore = Arc::new(MemoryKeystore::new());
        let identity = cross_signed_identity(keystore.as_ref(), &key_material).await;
        Self {
            key_material,
            keystore,
            content_store: MemoryContentStore::new(),
            identity,
        }
    }

    /// A policy letting only this fixture's identity write to `name`.
    pub fn own_policy(&self, name: &str) -> AccessPolicy {
        AccessPolicy::new(name, [self.identity.id.clone()])
    }

    /// An entry produced by this fixture's identity.
    pub fn entry(&self, payload: &[u8]) -> Entry {
        Entry::new(self.identity.clone(), payload.to_vec())
    }
}

/// Cross-sign `key_material` through `keystore`, creating the host key if needed.
pub async fn cross_signed_identity<K: Keystore + ?Sized>(
    keystore: &K,
    key_material: &KeyMaterial,
) -> Identity {
    let id = key_material.id();
    let host_key = match keystore.get_key(&id).await.expect("keystore lookup") {
        Some(key) => key,
        None => keystore.create_key(&id).await.expect("keystore create"),
    };
    let public_key = host_key.to_hex();
    let id_signature = keystore
        .sign(&id, id.as_bytes())
        .await
        .expect("keystore sign")
        .to_hex();
    let message = identity_signing_message(&public_key, &id_signature);
    let cross = sign_identity(&message, key_material).expect("cross-sign");
    Identity::new(id, public_key, id_signature, cross.to_hex())
}

/// Create fixtures with distinct seeded keys for multi-writer tests.
pub async fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    let mut fixtures = Vec::with_capacity(count);
    for i in 0..count {
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&(i as u64).to_le_bytes());
        fixtures.push(TestFixture::with_seed(seed).await);
    }
    fixtures
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallylab_iam_access::can_append;
    use tallylab_iam_core::verify_full;

    #[tokio::test]
    async fn test_fixture_identity_verifies() {
        let fixture = TestFixture::new().await;
        assert!(verify_full(&fixture.identity).unwrap());
        assert!(fixture.keystore.has_key(&fixture.identity.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_fixture_can_write_own_resource() {
        let fixture = TestFixture::new().await;
        let policy = fixture.own_policy("root");
        let entry = fixture.entry(b"x");
        assert!(can_append(&entry, &fixture.identity, &policy, fixture.keystore.as_ref())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_multi_party() {
        let parties = multi_party_fixtures(3).await;
        let ids: Vec<_> = parties.iter().map(|p| p.identity.id.clone()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[tokio::test]
    async fn test_multi_party_ids_stay_distinct_past_one_byte() {
        let parties = multi_party_fixtures(258).await;
        let ids: std::collections::HashSet<_> =
            parties.iter().map(|p| p.identity.id.clone()).collect();
        assert_eq!(ids.len(), 258);
    }
}
