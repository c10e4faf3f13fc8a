//! String-compatible key export.
//!
//! Key material leaves the process as JSON with every key rendered as a
//! decimal byte list:
//!
//! ```json
//! {"privateKey":"..","publicKey":"..","signing":{"signPk":"..","signSk":".."},"securityVersion":"2"}
//! ```
//!
//! `securityVersion` is written as `"1.1"` or `"2"`; `"2.0"` is accepted on import.

use serde::{Deserialize, Serialize};

use crate::crypto::Ed25519PublicKey;
use crate::error::{CoreError, Result};
use crate::keys::{KeyMaterial, SecurityVersion};
use crate::types::{parse_byte_array, parse_byte_list, to_byte_list};

/// Signing half of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningExport {
    pub sign_pk: String,
    /// Empty when the signing secret was not exported.
    pub sign_sk: String,
}

/// Externalized form of [`KeyMaterial`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMaterialExport {
    pub private_key: String,
    pub public_key: String,
    pub signing: SigningExport,
    pub security_version: String,
}

impl KeyMaterialExport {
    /// Render key material for storage or transmission.
    pub fn from_key_material(km: &KeyMaterial) -> Self {
        Self {
            private_key: to_byte_list(km.encryption_private_key()),
            public_key: to_byte_list(km.encryption_public_key()),
            signing: SigningExport {
                sign_pk: to_byte_list(km.signing_public_key().as_bytes()),
                sign_sk: km
                    .signing_private_key()
                    .map(|sk| to_byte_list(sk))
                    .unwrap_or_default(),
            },
            security_version: km.security_version().as_str().to_string(),
        }
    }

    /// Rebuild key material, checking every length and the signing keypair.
    pub fn to_key_material(&self) -> Result<KeyMaterial> {
        let signing_secret = if self.signing.sign_sk.is_empty() {
            None
        } else {
            let bytes = parse_byte_list(&self.signing.sign_sk)?;
            let arr: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
                CoreError::MalformedKey(format!("signSk must be 64 bytes, got {}", bytes.len()))
            })?;
            Some(arr)
        };

        KeyMaterial::from_parts(
            parse_byte_array::<32>(&self.public_key)?,
            parse_byte_array::<32>(&self.private_key)?,
            Ed25519PublicKey::from_bytes(parse_byte_array::<32>(&self.signing.sign_pk)?),
            signing_secret,
            SecurityVersion::parse(&self.security_version)?,
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

impl KeyMaterial {
    /// The string-compatible export of this key material.
    pub fn to_export(&self) -> KeyMaterialExport {
        KeyMaterialExport::from_key_material(self)
    }

    /// Serialize the export as JSON.
    pub fn to_stringified(&self) -> Result<String> {
        self.to_export().to_json()
    }

    /// Parse key material from its JSON export.
    pub fn from_stringified(json: &str) -> Result<Self> {
        KeyMaterialExport::from_json(json)?.to_key_material()
    }
}
