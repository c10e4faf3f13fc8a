//! The TallyLab access controller.
//!
//! Wraps a static [`AccessPolicy`] with the lifecycle the host expects:
//! create from options, save to and load from the content store, and decide
//! appends. Writers are fixed; there is no grant or revoke.

use std::time::Duration;

use tallylab_iam_access::{
    self as access, AccessPolicy, Entry, ResourceManifest, ACCESS_CONTROLLER_TYPE,
};
use tallylab_iam_core::{Cid, Identity};
use tallylab_iam_store::{ContentStore, Keystore};

use crate::error::{IamError, Result};

/// Options for [`AccessController::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControllerOptions {
    /// Controller type. Must be `"tallylab"`.
    pub kind: String,
    /// Resource name the controller guards.
    pub name: String,
    /// Identity ids allowed to write.
    pub write: Vec<String>,
}

impl Default for AccessControllerOptions {
    fn default() -> Self {
        Self {
            kind: ACCESS_CONTROLLER_TYPE.to_string(),
            name: String::new(),
            write: Vec::new(),
        }
    }
}

impl AccessControllerOptions {
    pub fn new<I, S>(name: impl Into<String>, write: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            write: write.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Options for creating a guarded resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Resource type as the host names it, e.g. `"keyvalue"` or `"feed"`.
    pub kind: String,
    pub access_controller: AccessControllerOptions,
}

impl ResourceOptions {
    pub fn new(kind: impl Into<String>, access_controller: AccessControllerOptions) -> Self {
        Self {
            kind: kind.into(),
            access_controller,
        }
    }
}

/// Decides appends for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessController {
    policy: AccessPolicy,
}

impl AccessController {
    /// Controller type under which this controller is registered.
    pub const TYPE: &'static str = ACCESS_CONTROLLER_TYPE;

    /// Create a controller from options.
    pub fn create(options: AccessControllerOptions) -> Result<Self> {
        if options.kind != Self::TYPE {
            return Err(IamError::UnsupportedType(options.kind));
        }
        Ok(Self {
            policy: AccessPolicy::new(options.name, options.write),
        })
    }

    pub fn from_policy(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn kind(&self) -> &'static str {
        Self::TYPE
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Address this controller's manifest would be saved under.
    pub fn address(&self) -> Result<Cid> {
        Ok(access::controller_address(&self.policy)?)
    }

    /// Save params and manifest, returning the manifest address.
    pub async fn save<S: ContentStore + ?Sized>(&self, store: &S) -> Result<Cid> {
        Ok(access::save_policy(store, &self.policy).await?)
    }

    /// Load a controller from its manifest address.
    pub async fn load<S: ContentStore + ?Sized>(store: &S, address: &Cid) -> Result<Self> {
        let policy = access::load_policy(store, address).await?;
        Ok(Self { policy })
    }

    /// Whether `entry` may be appended while `current_identity` is active.
    pub async fn can_append<K: Keystore + ?Sized>(
        &self,
        entry: &Entry,
        current_identity: &Identity,
        keystore: &K,
    ) -> Result<bool> {
        Ok(access::can_append(entry, current_identity, &self.policy, keystore).await?)
    }

    /// [`Self::can_append`] bounded by `timeout`. Expiry denies.
    pub async fn can_append_within<K: Keystore + ?Sized>(
        &self,
        entry: &Entry,
        current_identity: &Identity,
        keystore: &K,
        timeout: Duration,
    ) -> Result<bool> {
        Ok(
            access::can_append_within(entry, current_identity, &self.policy, keystore, timeout)
                .await?,
        )
    }
}

/// Address of the resource described by `options`, without storing anything.
pub fn resource_address(options: &ResourceOptions) -> Result<Cid> {
    let controller = AccessController::create(options.access_controller.clone())?;
    Ok(access::resource_address(controller.policy(), &options.kind)?)
}

/// Save a resource's controller and manifest.
///
/// Returns the resource address and its controller.
pub async fn create_resource<S: ContentStore + ?Sized>(
    store: &S,
    options: &ResourceOptions,
) -> Result<(Cid, AccessController)> {
    let controller = AccessController::create(options.access_controller.clone())?;
    let controller_address = controller.save(store).await?;
    let manifest = ResourceManifest::new(
        controller.policy().resource_name(),
        options.kind.as_str(),
        &controller_address,
    );
    let address = access::save_resource(store, &manifest).await?;
    Ok((address, controller))
}

/// Load a resource's controller from the resource address.
pub async fn open_resource<S: ContentStore + ?Sized>(
    store: &S,
    address: &Cid,
) -> Result<(ResourceManifest, AccessController)> {
    let manifest = access::load_resource(store, address).await?;
    let controller = AccessController::load(store, &manifest.controller_address()?).await?;
    Ok((manifest, controller))
}
