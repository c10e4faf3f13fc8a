//! Cross-signed identities.
//!
//! An identity proves joint control of two independently generated keypairs:
//! the TallyLab signing keypair and a keypair held by the host keystore.
//!
//! 1. The host signs the identity id with its own key (`signatures.id`).
//! 2. TallyLab signs `publicKey ++ signatures.id` with its signing key
//!    (`signatures.publicKey`).
//!
//! Neither side learns the other's private key.

use serde::{Deserialize, Serialize};

use crate::crypto::{Ed25519PublicKey, Ed25519Signature};
use crate::error::{CoreError, Result, VerificationError};
use crate::keys::KeyMaterial;
use crate::types::parse_byte_array;

/// Provider type under which TallyLab identities are registered.
pub const IDENTITY_TYPE: &str = "TallyLab";

/// The two signatures binding an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySignatures {
    /// Host signature over the identity id, hex.
    pub id: String,
    /// TallyLab signature over `publicKey ++ signatures.id`, hex.
    pub public_key: String,
}

/// A cross-signed identity as exchanged with the host.
///
/// Serializes as `{ id, publicKey, signatures: { id, publicKey }, type }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// The TallyLab signing public key as a decimal byte list.
    pub id: String,
    /// The host public key, hex.
    pub public_key: String,
    pub signatures: IdentitySignatures,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Identity {
    /// Assemble a TallyLab identity from its parts.
    pub fn new(
        id: impl Into<String>,
        public_key: impl Into<String>,
        id_signature: impl Into<String>,
        cross_signature: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            public_key: public_key.into(),
            signatures: IdentitySignatures {
                id: id_signature.into(),
                public_key: cross_signature.into(),
            },
            kind: IDENTITY_TYPE.to_string(),
        }
    }

    /// The bytes the host presents for cross-signing.
    pub fn signing_message(&self) -> Vec<u8> {
        identity_signing_message(&self.public_key, &self.signatures.id)
    }

    /// Whether both signature fields are populated.
    pub fn has_signatures(&self) -> bool {
        !self.signatures.id.is_empty() && !self.signatures.public_key.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

/// Build the message the host presents for cross-signing.
///
/// Format: `public_key_hex || id_signature_hex`, as UTF-8 bytes.
pub fn identity_signing_message(public_key_hex: &str, id_signature_hex: &str) -> Vec<u8> {
    let mut msg = Vec::with_capacity(public_key_hex.len() + id_signature_hex.len());
    msg.extend_from_slice(public_key_hex.as_bytes());
    msg.extend_from_slice(id_signature_hex.as_bytes());
    msg
}

/// Cross-sign the bytes the host presented with the TallyLab signing key.
///
/// Pure. Fails only when the key material has no signing secret.
pub fn sign_identity(message: &[u8], key_material: &KeyMaterial) -> Result<Ed25519Signature> {
    key_material.sign(message)
}

/// Check the host half of an identity.
///
/// Decodes `identity.publicKey` and checks that `identity.signatures.id`
/// is its signature over the bytes of `identity.id`.
///
/// Returns `Ok(false)` for a well-formed signature that does not match and
/// `Err` when the key or signature cannot be decoded at all.
pub fn verify_identity(identity: &Identity) -> std::result::Result<bool, VerificationError> {
    let public_key = decode_public_key_hex(&identity.public_key)?;
    let signature = decode_signature_hex(&identity.signatures.id)?;
    check(&public_key, identity.id.as_bytes(), &signature)
}

/// Check the TallyLab half of an identity.
///
/// Recovers the signing public key from `identity.id` and checks
/// `identity.signatures.publicKey` over `publicKey ++ signatures.id`.
pub fn verify_cross_signature(
    identity: &Identity,
) -> std::result::Result<bool, VerificationError> {
    let public_key = parse_byte_array::<32>(&identity.id)
        .map(Ed25519PublicKey::from_bytes)
        .map_err(|e| VerificationError::MalformedId(e.to_string()))?;
    public_key
        .validate()
        .map_err(|e| VerificationError::MalformedId(e.to_string()))?;
    let signature = decode_signature_hex(&identity.signatures.public_key)?;
    check(&public_key, &identity.signing_message(), &signature)
}

/// Check both halves. Short-circuits on the first `false`.
pub fn verify_full(identity: &Identity) -> std::result::Result<bool, VerificationError> {
    if !verify_identity(identity)? {
        return Ok(false);
    }
    verify_cross_signature(identity)
}

fn decode_public_key_hex(s: &str) -> std::result::Result<Ed25519PublicKey, VerificationError> {
    let public_key = Ed25519PublicKey::from_hex(s)
        .map_err(|e| VerificationError::MalformedPublicKey(e.to_string()))?;
    public_key
        .validate()
        .map_err(|e| VerificationError::MalformedPublicKey(e.to_string()))?;
    Ok(public_key)
}

fn decode_signature_hex(s: &str) -> std::result::Result<Ed25519Signature, VerificationError> {
    Ed25519Signature::from_hex(s).map_err(|e| VerificationError::MalformedSignature(e.to_string()))
}

fn check(
    public_key: &Ed25519PublicKey,
    message: &[u8],
    signature: &Ed25519Signature,
) -> std::result::Result<bool, VerificationError> {
    match public_key.verify(message, signature) {
        Ok(()) => Ok(true),
        Err(CoreError::InvalidPublicKey) => Err(VerificationError::MalformedPublicKey(
            "not a valid curve point".into(),
        )),
        Err(_) => Ok(false),
    }
}
