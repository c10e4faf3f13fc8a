//! # TallyLab IAM Access
//!
//! Static write policies and the append decision.
//!
//! ## Overview
//!
//! A resource is guarded by an [`AccessPolicy`]: a name and an ordered list
//! of identity ids allowed to write. The policy is persisted as canonical
//! manifests (see [`manifest`]) so its address is a pure function of its
//! contents. Every append attempt runs through [`can_append`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tallylab_iam_access::{can_append, AccessPolicy, Entry};
//! use tallylab_iam_store::MemoryKeystore;
//!
//! # async fn example(identity: tallylab_iam_core::Identity) -> tallylab_iam_access::Result<()> {
//! let keystore = MemoryKeystore::new();
//! let policy = AccessPolicy::new("root", [identity.id.clone()]);
//! let entry = Entry::new(identity.clone(), &b"payload"[..]);
//!
//! if can_append(&entry, &identity, &policy, &keystore).await? {
//!     // append
//! }
//! # Ok(())
//! # }
//! ```

pub mod decision;
pub mod error;
pub mod manifest;
pub mod policy;

pub use decision::{can_append, can_append_within, Entry};
pub use error::{AccessError, Result};
pub use manifest::{
    controller_address, load_policy, load_resource, params_address, resource_address,
    save_policy, save_resource, AccessControllerManifest, AccessControllerParams,
    ManifestParams, ResourceManifest, ACCESS_CONTROLLER_TYPE,
};
pub use policy::AccessPolicy;
