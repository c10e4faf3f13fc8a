//! # TallyLab IAM Core
//!
//! Pure primitives for binding TallyLab keys to a host log's identity system.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over key material, identities and manifests.
//!
//! ## Key Types
//!
//! - [`KeyMaterial`] - Encryption and signing keypairs derived from one seed
//! - [`Identity`] - A host keypair and a TallyLab keypair, cross-signed
//! - [`Cid`] - Content address of a canonical manifest
//!
//! ## Operations
//!
//! - [`KeyMaterial::derive`] - seeded (2.0) or random (1.1) key generation
//! - [`sign_identity`] - cross-sign the bytes the host presents
//! - [`verify_identity`] - check the host signature over the identity id
//!
//! ## Canonicalization
//!
//! Manifests are encoded using deterministic CBOR. See [`canonical`] module.

pub mod address;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod export;
pub mod identity;
pub mod keys;
pub mod types;

pub use address::{Cid, Multibase};
pub use canonical::canonical_bytes;
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash};
pub use error::{CoreError, Result, VerificationError};
pub use export::{KeyMaterialExport, SigningExport};
pub use identity::{
    identity_signing_message, sign_identity, verify_cross_signature, verify_full,
    verify_identity, Identity, IdentitySignatures, IDENTITY_TYPE,
};
pub use keys::{KeyMaterial, KeygenOptions, SecurityVersion, SEED_LEN};
pub use types::{parse_byte_list, to_byte_list};
