//! Provider and controller registration.
//!
//! The host owns a registry of identity-provider and access-controller
//! types. [`register`] adds TallyLab's entries to it; nothing is registered
//! implicitly.

use std::collections::HashSet;
use std::sync::RwLock;

use tallylab_iam_access::ACCESS_CONTROLLER_TYPE;
use tallylab_iam_core::IDENTITY_TYPE;

use crate::error::{IamError, Result};

/// A host-owned table of provider and controller types.
pub trait Registry: Send + Sync {
    /// Add an identity-provider type. Returns `false` if already present.
    fn add_identity_provider(&self, kind: &str) -> Result<bool>;

    /// Add an access-controller type. Returns `false` if already present.
    fn add_access_controller(&self, kind: &str) -> Result<bool>;

    fn has_identity_provider(&self, kind: &str) -> Result<bool>;

    fn has_access_controller(&self, kind: &str) -> Result<bool>;
}

/// Register the `"TallyLab"` identity provider and the `"tallylab"` access
/// controller. Calling it again is a no-op.
pub fn register<R: Registry + ?Sized>(registry: &R) -> Result<()> {
    if registry.add_identity_provider(IDENTITY_TYPE)? {
        tracing::info!(kind = IDENTITY_TYPE, "registered identity provider");
    }
    if registry.add_access_controller(ACCESS_CONTROLLER_TYPE)? {
        tracing::info!(kind = ACCESS_CONTROLLER_TYPE, "registered access controller");
    }
    Ok(())
}

/// In-memory registry.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    providers: RwLock<HashSet<String>>,
    controllers: RwLock<HashSet<String>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert(set: &RwLock<HashSet<String>>, kind: &str) -> Result<bool> {
    let mut set = set
        .write()
        .map_err(|_| IamError::LockPoisoned("registry"))?;
    Ok(set.insert(kind.to_string()))
}

fn contains(set: &RwLock<HashSet<String>>, kind: &str) -> Result<bool> {
    let set = set
        .read()
        .map_err(|_| IamError::LockPoisoned("registry"))?;
    Ok(set.contains(kind))
}

impl Registry for MemoryRegistry {
    fn add_identity_provider(&self, kind: &str) -> Result<bool> {
        insert(&self.providers, kind)
    }

    fn add_access_controller(&self, kind: &str) -> Result<bool> {
        insert(&self.controllers, kind)
    }

    fn has_identity_provider(&self, kind: &str) -> Result<bool> {
        contains(&self.providers, kind)
    }

    fn has_access_controller(&self, kind: &str) -> Result<bool> {
        contains(&self.controllers, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_adds_both_types() {
        let registry = MemoryRegistry::new();
        assert!(!registry.has_identity_provider("TallyLab").unwrap());

        register(&registry).unwrap();
        assert!(registry.has_identity_provider("TallyLab").unwrap());
        assert!(registry.has_access_controller("tallylab").unwrap());
        assert!(!registry.has_identity_provider("tallylab").unwrap());
        assert!(!registry.has_access_controller("TallyLab").unwrap());
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = MemoryRegistry::new();
        register(&registry).unwrap();
        register(&registry).unwrap();
        assert!(!registry.add_identity_provider("TallyLab").unwrap());
        assert!(!registry.add_access_controller("tallylab").unwrap());
    }

    #[test]
    fn test_register_through_trait_object() {
        let registry: Box<dyn Registry> = Box::new(MemoryRegistry::new());
        register(registry.as_ref()).unwrap();
        assert!(registry.has_access_controller("tallylab").unwrap());
    }
}
