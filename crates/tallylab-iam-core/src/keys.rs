//! Key material derivation.
//!
//! A single 32-byte seed expands into two independent keypairs:
//!
//! - an X25519 box keypair: `secret = SHA-512(seed)[..32]`, `public = X25519(secret)`
//! - an Ed25519 signing keypair whose 64-byte secret is `seed || public`
//!
//! These match NaCl's `crypto_box_seed_keypair` and `crypto_sign_seed_keypair`,
//! so seeded keys reproduce byte for byte across implementations. Account
//! recovery depends on it.

use ed25519_dalek::{Signer, SigningKey};
use rand::RngCore;
use sha2::{Digest, Sha512};
use std::fmt;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::crypto::{Ed25519PublicKey, Ed25519Signature};
use crate::error::{CoreError, Result};
use crate::types::to_byte_list;

/// Required seed length in bytes.
pub const SEED_LEN: usize = 32;

/// How a set of keys came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityVersion {
    /// Keys drawn from a random seed (1.1).
    Random,
    /// Keys derived from a caller-supplied seed (2.0).
    Seeded,
}

impl SecurityVersion {
    /// Canonical string form: `"1.1"` or `"2"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SecurityVersion::Random => "1.1",
            SecurityVersion::Seeded => "2",
        }
    }

    /// Parse a version string. Accepts both `"2"` and `"2.0"`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "1.1" => Ok(SecurityVersion::Random),
            "2" | "2.0" => Ok(SecurityVersion::Seeded),
            other => Err(CoreError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl fmt::Display for SecurityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`KeyMaterial::derive_with`].
#[derive(Debug, Clone, Default)]
pub struct KeygenOptions {
    /// Seed bytes. `None` draws a random seed.
    pub seed: Option<Vec<u8>>,
}

impl KeygenOptions {
    /// Options for random key generation.
    pub fn random() -> Self {
        Self::default()
    }

    /// Options for seeded key generation. Strings are taken as their bytes.
    pub fn with_seed(seed: impl AsRef<[u8]>) -> Self {
        Self {
            seed: Some(seed.as_ref().to_vec()),
        }
    }
}

/// The TallyLab keys: an encryption keypair and a signing keypair.
///
/// Immutable once derived. The signing secret may be absent when the
/// material was imported from a public-only export.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    encryption_public: [u8; 32],
    encryption_secret: [u8; 32],
    signing_public: Ed25519PublicKey,
    signing_secret: Option<[u8; 64]>,
    security_version: SecurityVersion,
}

impl KeyMaterial {
    /// Derive key material from an optional seed.
    ///
    /// A present seed must be exactly 32 bytes. Without a seed, 32 bytes are
    /// drawn from the OS RNG and the material is marked [`SecurityVersion::Random`].
    pub fn derive(seed: Option<&[u8]>) -> Result<Self> {
        match seed {
            Some(bytes) => {
                let seed: [u8; SEED_LEN] = bytes
                    .try_into()
                    .map_err(|_| CoreError::InvalidSeedLength(bytes.len()))?;
                Ok(Self::from_seed(&seed, SecurityVersion::Seeded))
            }
            None => {
                let mut seed = [0u8; SEED_LEN];
                rand::rngs::OsRng.fill_bytes(&mut seed);
                Ok(Self::from_seed(&seed, SecurityVersion::Random))
            }
        }
    }

    /// Derive key material from explicit options.
    pub fn derive_with(options: &KeygenOptions) -> Result<Self> {
        Self::derive(options.seed.as_deref())
    }

    fn from_seed(seed: &[u8; SEED_LEN], security_version: SecurityVersion) -> Self {
        let digest = Sha512::digest(seed);
        let mut encryption_secret = [0u8; 32];
        encryption_secret.copy_from_slice(&digest[..32]);
        let encryption_public = PublicKey::from(&StaticSecret::from(encryption_secret)).to_bytes();

        let signing_key = SigningKey::from_bytes(seed);

        Self {
            encryption_public,
            encryption_secret,
            signing_public: Ed25519PublicKey(signing_key.verifying_key().to_bytes()),
            signing_secret: Some(signing_key.to_keypair_bytes()),
            security_version,
        }
    }

    /// Reassemble key material from its parts.
    ///
    /// When a signing secret is given, its public half must match `signing_public`.
    pub fn from_parts(
        encryption_public: [u8; 32],
        encryption_secret: [u8; 32],
        signing_public: Ed25519PublicKey,
        signing_secret: Option<[u8; 64]>,
        security_version: SecurityVersion,
    ) -> Result<Self> {
        if let Some(secret) = &signing_secret {
            let key = SigningKey::from_keypair_bytes(secret)
                .map_err(|e| CoreError::MalformedKey(e.to_string()))?;
            if key.verifying_key().to_bytes() != signing_public.0 {
                return Err(CoreError::MalformedKey(
                    "signing secret does not match signing public key".into(),
                ));
            }
        }
        Ok(Self {
            encryption_public,
            encryption_secret,
            signing_public,
            signing_secret,
            security_version,
        })
    }

    /// The identity id: the signing public key as a decimal byte list.
    pub fn id(&self) -> String {
        to_byte_list(self.signing_public.as_bytes())
    }

    pub fn encryption_public_key(&self) -> &[u8; 32] {
        &self.encryption_public
    }

    pub fn encryption_private_key(&self) -> &[u8; 32] {
        &self.encryption_secret
    }

    pub fn signing_public_key(&self) -> &Ed25519PublicKey {
        &self.signing_public
    }

    /// The 64-byte signing secret (`seed || public`), if present.
    pub fn signing_private_key(&self) -> Option<&[u8; 64]> {
        self.signing_secret.as_ref()
    }

    pub fn security_version(&self) -> SecurityVersion {
        self.security_version
    }

    /// Sign a message with the signing secret.
    pub fn sign(&self, message: &[u8]) -> Result<Ed25519Signature> {
        let secret = self.signing_secret.as_ref().ok_or(CoreError::MissingSigningKey)?;
        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(&secret[..SEED_LEN]);
        let signing_key = SigningKey::from_bytes(&seed);
        Ok(Ed25519Signature(signing_key.sign(message).to_bytes()))
    }

    /// Drop the signing secret, keeping everything else.
    pub fn without_signing_secret(&self) -> Self {
        Self {
            signing_secret: None,
            ..self.clone()
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("signing_public", &self.signing_public)
            .field("has_signing_secret", &self.signing_secret.is_some())
            .field("security_version", &self.security_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &[u8] = b"thisisexactlythirtytwocharacters";

    #[test]
    fn test_seeded_derivation_is_deterministic() {
        let a = KeyMaterial::derive(Some(SEED)).unwrap();
        let b = KeyMaterial::derive(Some(SEED)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.security_version(), SecurityVersion::Seeded);
    }

    #[test]
    fn test_seeded_golden_keys() {
        let km = KeyMaterial::derive(Some(SEED)).unwrap();
        assert_eq!(
            to_byte_list(km.encryption_public_key()),
            "196,6,185,18,253,10,139,84,248,51,221,118,178,67,198,54,240,69,252,14,209,185,54,18,133,11,125,130,46,86,69,81"
        );
        assert_eq!(
            to_byte_list(km.encryption_private_key()),
            "32,196,135,206,166,39,190,242,200,133,233,237,195,140,106,215,158,170,95,67,254,186,199,178,105,190,107,61,180,218,175,167"
        );
        assert_eq!(
            km.id(),
            "203,57,32,160,244,50,95,92,194,226,114,226,82,141,243,249,184,46,65,165,102,65,137,254,205,255,177,173,246,143,229,170"
        );
    }

    #[test]
    fn test_signing_secret_is_seed_then_public() {
        let km = KeyMaterial::derive(Some(SEED)).unwrap();
        let secret = km.signing_private_key().unwrap();
        assert_eq!(&secret[..32], SEED);
        assert_eq!(&secret[32..], km.signing_public_key().as_bytes());
    }

    #[test]
    fn test_random_derivation() {
        let km = KeyMaterial::derive(None).unwrap();
        assert_eq!(km.security_version(), SecurityVersion::Random);
        assert_eq!(km.encryption_public_key().len(), 32);
        assert_eq!(km.signing_private_key().unwrap().len(), 64);

        let other = KeyMaterial::derive(None).unwrap();
        assert_ne!(km.id(), other.id());
    }

    #[test]
    fn test_invalid_seed_lengths() {
        for len in [0usize, 31, 33] {
            let seed = vec![b'a'; len];
            match KeyMaterial::derive(Some(seed.as_slice())) {
                Err(CoreError::InvalidSeedLength(n)) => assert_eq!(n, len),
                other => panic!("expected InvalidSeedLength for {}, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_derive_with_options() {
        let km = KeyMaterial::derive_with(&KeygenOptions::with_seed("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz"))
            .unwrap();
        assert_eq!(km.security_version(), SecurityVersion::Seeded);
        let random = KeyMaterial::derive_with(&KeygenOptions::random()).unwrap();
        assert_eq!(random.security_version(), SecurityVersion::Random);
    }

    #[test]
    fn test_sign_without_secret_fails() {
        let km = KeyMaterial::derive(Some(SEED)).unwrap().without_signing_secret();
        assert!(matches!(km.sign(b"msg"), Err(CoreError::MissingSigningKey)));
    }

    #[test]
    fn test_from_parts_rejects_mismatched_secret() {
        let a = KeyMaterial::derive(Some(SEED)).unwrap();
        let b = KeyMaterial::derive(None).unwrap();
        let result = KeyMaterial::from_parts(
            *a.encryption_public_key(),
            *a.encryption_private_key(),
            *a.signing_public_key(),
            b.signing_private_key().copied(),
            SecurityVersion::Seeded,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_security_version_strings() {
        assert_eq!(SecurityVersion::Random.as_str(), "1.1");
        assert_eq!(SecurityVersion::Seeded.to_string(), "2");
        assert_eq!(SecurityVersion::parse("2.0").unwrap(), SecurityVersion::Seeded);
        assert_eq!(SecurityVersion::parse("2").unwrap(), SecurityVersion::Seeded);
        assert_eq!(SecurityVersion::parse("1.1").unwrap(), SecurityVersion::Random);
        assert!(SecurityVersion::parse("3").is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let km = KeyMaterial::derive(Some(SEED)).unwrap();
        let debug = format!("{:?}", km);
        assert!(!debug.contains("encryption_secret"));
        assert!(debug.contains("has_signing_secret: true"));
    }
}
