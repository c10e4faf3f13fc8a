//! The TallyLab identity provider.
//!
//! Creating an identity is a round trip between the host keystore and the
//! TallyLab signing key:
//!
//! 1. `id = key_material.id()`
//! 2. the keystore fetches or creates the host key for `id`
//! 3. the keystore signs `id` (`signatures.id`)
//! 4. TallyLab signs `publicKey ++ signatures.id` (`signatures.publicKey`)
//!
//! The TallyLab signature can also be computed outside the provider and
//! passed in, so the signing secret never has to reach it.

use std::sync::Arc;

use tallylab_iam_core::{
    identity_signing_message, sign_identity, verify_full, Ed25519Signature, Identity, KeyMaterial,
    IDENTITY_TYPE,
};
use tallylab_iam_store::Keystore;

use crate::error::{IamError, Result};

/// Options for [`IdentityProvider::create_identity`].
///
/// Supply either `key_material` (the provider cross-signs), or `id` plus
/// `cross_signature` (the caller already cross-signed).
#[derive(Debug, Clone, Default)]
pub struct CreateIdentityOptions {
    /// Provider type. Defaults to `"TallyLab"`.
    pub kind: Option<String>,
    pub key_material: Option<KeyMaterial>,
    pub id: Option<String>,
    pub cross_signature: Option<Ed25519Signature>,
}

impl CreateIdentityOptions {
    /// Cross-sign with `key_material` inside the provider.
    pub fn with_key_material(key_material: KeyMaterial) -> Self {
        Self {
            key_material: Some(key_material),
            ..Self::default()
        }
    }

    /// Use a cross-signature computed by the caller.
    pub fn with_cross_signature(id: impl Into<String>, cross_signature: Ed25519Signature) -> Self {
        Self {
            id: Some(id.into()),
            cross_signature: Some(cross_signature),
            ..Self::default()
        }
    }

    fn resolve_id(&self) -> Result<String> {
        match (&self.key_material, &self.id) {
            (Some(km), Some(id)) if km.id() != *id => Err(IamError::InvalidOptions(
                "id does not match key material".into(),
            )),
            (Some(km), _) => Ok(km.id()),
            (None, Some(id)) if self.cross_signature.is_some() => Ok(id.clone()),
            (None, _) => Err(IamError::InvalidOptions(
                "either key material or an id with a cross signature is required".into(),
            )),
        }
    }
}

/// Creates TallyLab identities against a host keystore.
pub struct IdentityProvider<K: Keystore> {
    keystore: Arc<K>,
}

impl<K: Keystore> IdentityProvider<K> {
    /// Provider type under which identities are registered.
    pub const TYPE: &'static str = IDENTITY_TYPE;

    pub fn new(keystore: Arc<K>) -> Self {
        Self { keystore }
    }

    pub fn keystore(&self) -> &K {
        &self.keystore
    }

    /// Create a cross-signed identity.
    ///
    /// The result is checked with [`verify_full`] before it is returned.
    pub async fn create_identity(&self, options: CreateIdentityOptions) -> Result<Identity> {
        if let Some(kind) = options.kind.as_deref() {
            if kind != IDENTITY_TYPE {
                return Err(IamError::UnsupportedType(kind.to_string()));
            }
        }
        let id = options.resolve_id()?;

        let host_key = match self.keystore.get_key(&id).await? {
            Some(key) => key,
            None => self.keystore.create_key(&id).await?,
        };
        let public_key = host_key.to_hex();
        let id_signature = self.keystore.sign(&id, id.as_bytes()).await?.to_hex();

        let cross_signature = match (options.cross_signature, &options.key_material) {
            (Some(signature), _) => signature,
            (None, Some(km)) => {
                sign_identity(&identity_signing_message(&public_key, &id_signature), km)?
            }
            (None, None) => {
                return Err(IamError::InvalidOptions(
                    "a cross signature is required without key material".into(),
                ))
            }
        };

        let identity = Identity::new(id, public_key, id_signature, cross_signature.to_hex());
        if !verify_full(&identity)? {
            return Err(IamError::InvalidIdentity(identity.id));
        }
        tracing::debug!(id = %identity.id, "created identity");
        Ok(identity)
    }

    /// Check the host signature of an identity.
    pub fn verify_identity(identity: &Identity) -> Result<bool> {
        Ok(tallylab_iam_core::verify_identity(identity)?)
    }
}
