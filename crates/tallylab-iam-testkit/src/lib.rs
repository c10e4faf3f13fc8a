//! # TallyLab IAM Testkit
//!
//! Testing utilities for TallyLab IAM.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Seeded keys and manifest addresses with known outputs
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Key material, keystore and identity set up together
//!
//! ## Golden Vectors
//!
//! ```rust
//! use tallylab_iam_testkit::vectors::verify_all_vectors;
//!
//! for (name, passed, detail) in verify_all_vectors() {
//!     assert!(passed, "{}: {}", name, detail);
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use tallylab_iam_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new().await;
//! let policy = fixture.own_policy("root");
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{cross_signed_identity, multi_party_fixtures, TestFixture};
pub use vectors::{
    check_key_vector, check_manifest_vector, key_vectors, manifest_vectors, verify_all_vectors,
    KeyVector, ManifestVector,
};
