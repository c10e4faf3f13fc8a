//! End-to-end flows: register, create identities, guard a resource, append.

use std::sync::Arc;

use anyhow::Result;
use tallylab_iam::core::Multibase;
use tallylab_iam::store::{ContentStore, Keystore, MemoryContentStore, MemoryKeystore};
use tallylab_iam::{
    create_resource, open_resource, register, resource_address, AccessController,
    AccessControllerOptions, CreateIdentityOptions, Entry, IamError, IdentityProvider, KeyMaterial,
    MemoryLog, MemoryRegistry, Registry, ResourceOptions,
};
use tallylab_iam_testkit::{key_vectors, TestFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[tokio::test]
async fn writes_entry_with_cross_signed_identity() -> Result<()> {
    init_tracing();

    let registry = MemoryRegistry::new();
    register(&registry)?;
    assert!(registry.has_identity_provider("TallyLab")?);

    let keystore = Arc::new(MemoryKeystore::new());
    let provider = IdentityProvider::new(keystore.clone());
    let identity = provider
        .create_identity(CreateIdentityOptions::with_key_material(KeyMaterial::derive(None)?))
        .await?;

    let store = MemoryContentStore::new();
    let options = ResourceOptions::new(
        "feed",
        AccessControllerOptions::new("root", [identity.id.clone()]),
    );
    let (_, controller) = create_resource(&store, &options).await?;

    let log = MemoryLog::new(controller, identity, keystore);
    log.append(&b"x"[..]).await?;
    assert_eq!(log.len()?, 1);
    Ok(())
}

#[tokio::test]
async fn rejects_random_identity() -> Result<()> {
    init_tracing();

    let owner = TestFixture::new().await;
    let intruder = TestFixture::new().await;
    let controller = AccessController::from_policy(owner.own_policy("root"));

    // The intruder's own log still consults the owner's policy.
    let log = MemoryLog::new(
        controller.clone(),
        intruder.identity.clone(),
        intruder.keystore.clone(),
    );
    let err = log.append(&b"x"[..]).await.unwrap_err();
    assert!(matches!(err, IamError::AppendDenied { .. }));

    // An intruder entry offered to the owner's log is refused too.
    let owner_log = MemoryLog::new(controller, owner.identity.clone(), owner.keystore.clone());
    let err = owner_log.append_entry(intruder.entry(b"x")).await.unwrap_err();
    assert!(matches!(err, IamError::AppendDenied { .. }));

    owner_log.append_entry(owner.entry(b"y")).await?;
    assert_eq!(owner_log.len()?, 1);
    Ok(())
}

#[tokio::test]
async fn seeded_resource_address_is_deterministic() -> Result<()> {
    let seed = key_vectors()[0].seed;
    let km = KeyMaterial::derive(Some(seed.as_bytes()))?;
    let options = ResourceOptions::new("keyvalue", AccessControllerOptions::new("root", [km.id()]));

    // Two independent stores, keystores and identities agree on the address.
    let mut addresses = Vec::new();
    for _ in 0..2 {
        let store = MemoryContentStore::new();
        let keystore = Arc::new(MemoryKeystore::new());
        let identity = IdentityProvider::new(keystore)
            .create_identity(CreateIdentityOptions::with_key_material(km.clone()))
            .await?;
        assert_eq!(identity.id, km.id());

        let (address, _) = create_resource(&store, &options).await?;
        addresses.push(address);
    }

    assert_eq!(addresses[0], addresses[1]);
    assert_eq!(addresses[0], resource_address(&options)?);
    assert_eq!(
        addresses[0].encode(Multibase::Base58Btc),
        "zdpuAv6krzrir1i3b5SD74xtEsVate4SdZrQZTJ3CSfV2ADHg"
    );
    Ok(())
}

#[tokio::test]
async fn reopened_resource_enforces_same_policy() -> Result<()> {
    init_tracing();

    let owner = TestFixture::new().await;
    let other = TestFixture::new().await;
    let options = ResourceOptions::new(
        "keyvalue",
        AccessControllerOptions::new("shared", [owner.identity.id.clone()]),
    );
    let (address, _) = create_resource(&owner.content_store, &options).await?;

    let (manifest, controller) = open_resource(&owner.content_store, &address).await?;
    assert_eq!(manifest.name, "shared");
    assert_eq!(controller.policy().write_allow_list(), &[owner.identity.id.clone()]);

    let allowed = controller
        .can_append(&owner.entry(b"a"), &owner.identity, owner.keystore.as_ref())
        .await?;
    assert!(allowed);

    let denied = controller
        .can_append(&other.entry(b"b"), &other.identity, other.keystore.as_ref())
        .await?;
    assert!(!denied);
    Ok(())
}

#[tokio::test]
async fn identity_survives_json_round_trip() -> Result<()> {
    let fixture = TestFixture::new().await;
    let json = fixture.identity.to_json()?;
    assert!(json.contains(r#""type":"TallyLab""#));

    let restored = tallylab_iam::Identity::from_json(&json)?;
    assert_eq!(restored, fixture.identity);
    assert!(tallylab_iam::verify_full(&restored)?);

    let entry = Entry::new(restored.clone(), &b"x"[..]);
    let policy = fixture.own_policy("root");
    assert!(
        tallylab_iam::access::can_append(&entry, &restored, &policy, fixture.keystore.as_ref())
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn key_export_restores_identity_id() -> Result<()> {
    let km = KeyMaterial::derive(None)?;
    let restored = KeyMaterial::from_stringified(&km.to_stringified()?)?;
    assert_eq!(restored.id(), km.id());

    // Restored keys produce an identity the same keystore still accepts.
    let keystore = Arc::new(MemoryKeystore::new());
    let provider = IdentityProvider::new(keystore.clone());
    let a = provider
        .create_identity(CreateIdentityOptions::with_key_material(km))
        .await?;
    let b = provider
        .create_identity(CreateIdentityOptions::with_key_material(restored))
        .await?;
    assert_eq!(a, b);
    assert!(keystore.has_key(&a.id).await?);
    Ok(())
}

#[tokio::test]
async fn manifests_land_in_content_store() -> Result<()> {
    let fixture = TestFixture::new().await;
    let controller = AccessController::from_policy(fixture.own_policy("root"));
    let address = controller.save(&fixture.content_store).await?;

    assert!(fixture.content_store.has(&address).await?);
    assert_eq!(fixture.content_store.len()?, 2);
    assert_eq!(AccessController::load(&fixture.content_store, &address).await?, controller);
    Ok(())
}
