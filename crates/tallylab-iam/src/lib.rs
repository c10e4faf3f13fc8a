//! # TallyLab IAM
//!
//! Binds a TallyLab keypair to a host log's identity and access-control
//! extension points.
//!
//! ## Overview
//!
//! - **Identities**: a TallyLab signing key and a host keystore key sign each
//!   other, so an identity proves control of both
//! - **Access control**: a resource has a fixed list of writers; every append
//!   is checked against it and against the writer's identity
//! - **Deterministic addresses**: the same resource name, writers and type
//!   always give the same resource address
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tallylab_iam::{
//!     register, AccessController, AccessControllerOptions, CreateIdentityOptions,
//!     IdentityProvider, KeyMaterial, MemoryLog, MemoryRegistry,
//! };
//! use tallylab_iam::store::MemoryKeystore;
//!
//! async fn example() -> tallylab_iam::Result<()> {
//!     let registry = MemoryRegistry::new();
//!     register(&registry)?;
//!
//!     // Seeded keys are reproducible across devices
//!     let keys = KeyMaterial::derive(Some(&b"thisisexactlythirtytwocharacters"[..]))?;
//!
//!     let keystore = Arc::new(MemoryKeystore::new());
//!     let provider = IdentityProvider::new(keystore.clone());
//!     let identity = provider
//!         .create_identity(CreateIdentityOptions::with_key_material(keys))
//!         .await?;
//!
//!     let controller = AccessController::create(AccessControllerOptions::new(
//!         "root",
//!         [identity.id.clone()],
//!     ))?;
//!     let log = MemoryLog::new(controller, identity, keystore);
//!     log.append(&b"x"[..]).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `tallylab_iam::core` - Key material, identities, content addresses
//! - `tallylab_iam::store` - Keystore and content store interfaces
//! - `tallylab_iam::access` - Policies, manifests and the append decision

pub mod controller;
pub mod error;
pub mod log;
pub mod provider;
pub mod registry;

// Re-export component crates
pub use tallylab_iam_access as access;
pub use tallylab_iam_core as core;
pub use tallylab_iam_store as store;

pub use controller::{
    create_resource, open_resource, resource_address, AccessController, AccessControllerOptions,
    ResourceOptions,
};
pub use error::{IamError, Result};
pub use log::{LogConfig, MemoryLog};
pub use provider::{CreateIdentityOptions, IdentityProvider};
pub use registry::{register, MemoryRegistry, Registry};

// Re-export commonly used types
pub use tallylab_iam_access::{AccessPolicy, Entry};
pub use tallylab_iam_core::{
    sign_identity, verify_cross_signature, verify_full, verify_identity, Cid, Identity,
    KeyMaterial, KeygenOptions, Multibase, SecurityVersion,
};
