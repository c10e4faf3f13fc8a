//! Access-controller and resource manifests.
//!
//! A policy is persisted as a chain of three canonical CBOR blocks:
//!
//! ```text
//! params    { name, type: "tallylab", write: [id..] }           -> b... (base32)
//! manifest  { params: { address: <params> }, type: "tallylab" }  -> z... (base58btc)
//! resource  { name, type, accessController: "/ipfs/<manifest>" } -> z... (base58btc)
//! ```
//!
//! The resource manifest address is what the host uses as the resource's
//! address, so the same name, writers and type always give the same address.

use serde::{Deserialize, Serialize};
use tallylab_iam_core::canonical::{canonical_bytes, decode};
use tallylab_iam_core::{Cid, Multibase};
use tallylab_iam_store::ContentStore;

use crate::error::{AccessError, Result};
use crate::policy::AccessPolicy;

/// Access-controller type under which TallyLab policies are registered.
pub const ACCESS_CONTROLLER_TYPE: &str = "tallylab";

/// Persisted policy parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControllerParams {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub write: Vec<String>,
}

/// Pointer from the access-controller manifest to its params block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestParams {
    /// Base32 address of the params block.
    pub address: String,
}

/// Access-controller manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControllerManifest {
    pub params: ManifestParams,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AccessControllerManifest {
    pub fn new(params_address: &Cid) -> Self {
        Self {
            params: ManifestParams {
                address: params_address.encode(Multibase::Base32Lower),
            },
            kind: ACCESS_CONTROLLER_TYPE.to_string(),
        }
    }
}

/// Resource manifest referencing its access controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// `/ipfs/<access-controller manifest address>`.
    pub access_controller: String,
}

impl ResourceManifest {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, controller: &Cid) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            access_controller: controller.to_path(),
        }
    }

    /// Address of the access-controller manifest this resource points at.
    pub fn controller_address(&self) -> Result<Cid> {
        Ok(Cid::parse(&self.access_controller)?)
    }
}

/// Address of a policy's params block.
pub fn params_address(policy: &AccessPolicy) -> Result<Cid> {
    Ok(Cid::for_value(&policy.to_params())?)
}

/// Address of the access-controller manifest for a policy.
pub fn controller_address(policy: &AccessPolicy) -> Result<Cid> {
    let manifest = AccessControllerManifest::new(&params_address(policy)?);
    Ok(Cid::for_value(&manifest)?)
}

/// Address of a resource of type `kind` guarded by `policy`.
pub fn resource_address(policy: &AccessPolicy, kind: &str) -> Result<Cid> {
    let manifest = ResourceManifest::new(policy.resource_name(), kind, &controller_address(policy)?);
    Ok(Cid::for_value(&manifest)?)
}

/// Persist a policy: params block, then the manifest that points at it.
///
/// Returns the manifest address.
pub async fn save_policy<S: ContentStore + ?Sized>(store: &S, policy: &AccessPolicy) -> Result<Cid> {
    let params = store.put(&canonical_bytes(&policy.to_params())?).await?;
    let manifest = AccessControllerManifest::new(&params);
    let address = store.put(&canonical_bytes(&manifest)?).await?;
    tracing::info!(
        resource = policy.resource_name(),
        writers = policy.write_allow_list().len(),
        address = %address.encode(Multibase::Base58Btc),
        "saved access policy"
    );
    Ok(address)
}

/// Load a policy from its access-controller manifest address.
pub async fn load_policy<S: ContentStore + ?Sized>(store: &S, address: &Cid) -> Result<AccessPolicy> {
    let manifest: AccessControllerManifest = fetch(store, address).await?;
    if manifest.kind != ACCESS_CONTROLLER_TYPE {
        return Err(AccessError::InvalidManifest(format!(
            "expected access controller type {:?}, got {:?}",
            ACCESS_CONTROLLER_TYPE, manifest.kind
        )));
    }
    let params_cid = Cid::parse(&manifest.params.address)?;
    let params: AccessControllerParams = fetch(store, &params_cid).await?;
    AccessPolicy::from_params(params)
}

/// Persist a resource manifest, returning the resource address.
pub async fn save_resource<S: ContentStore + ?Sized>(
    store: &S,
    manifest: &ResourceManifest,
) -> Result<Cid> {
    Ok(store.put(&canonical_bytes(manifest)?).await?)
}

/// Load a resource manifest.
pub async fn load_resource<S: ContentStore + ?Sized>(
    store: &S,
    address: &Cid,
) -> Result<ResourceManifest> {
    fetch(store, address).await
}

async fn fetch<S, T>(store: &S, address: &Cid) -> Result<T>
where
    S: ContentStore + ?Sized,
    T: serde::de::DeserializeOwned,
{
    let bytes = store
        .get(address)
        .await?
        .ok_or_else(|| AccessError::ManifestNotFound(address.encode(Multibase::Base58Btc)))?;
    decode(&bytes).map_err(|e| AccessError::InvalidManifest(e.to_string()))
}
