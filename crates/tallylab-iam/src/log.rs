//! An in-memory append-only log guarded by an access controller.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use bytes::Bytes;
use tallylab_iam_access::Entry;
use tallylab_iam_core::Identity;
use tallylab_iam_store::Keystore;

use crate::controller::AccessController;
use crate::error::{IamError, Result};

/// Configuration for a [`MemoryLog`].
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Upper bound on each append decision. Expiry denies.
    pub decision_timeout: Option<Duration>,
}

/// Append-only log that asks its controller before every append.
pub struct MemoryLog<K: Keystore> {
    controller: AccessController,
    identity: Identity,
    keystore: Arc<K>,
    config: LogConfig,
    entries: RwLock<Vec<Entry>>,
}

impl<K: Keystore> MemoryLog<K> {
    /// Open a log written as `identity`.
    pub fn new(controller: AccessController, identity: Identity, keystore: Arc<K>) -> Self {
        Self::with_config(controller, identity, keystore, LogConfig::default())
    }

    pub fn with_config(
        controller: AccessController,
        identity: Identity,
        keystore: Arc<K>,
        config: LogConfig,
    ) -> Self {
        Self {
            controller,
            identity,
            keystore,
            config,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn controller(&self) -> &AccessController {
        &self.controller
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Append a payload as this log's identity. Returns the entry's position.
    pub async fn append(&self, payload: impl Into<Bytes>) -> Result<usize> {
        self.append_entry(Entry::new(self.identity.clone(), payload))
            .await
    }

    /// Append an entry produced elsewhere, e.g. received from a peer.
    pub async fn append_entry(&self, entry: Entry) -> Result<usize> {
        let allowed = match self.config.decision_timeout {
            Some(timeout) => {
                self.controller
                    .can_append_within(&entry, &self.identity, self.keystore.as_ref(), timeout)
                    .await?
            }
            None => {
                self.controller
                    .can_append(&entry, &self.identity, self.keystore.as_ref())
                    .await?
            }
        };

        if !allowed {
            return Err(IamError::AppendDenied {
                resource: self.controller.policy().resource_name().to_string(),
                id: entry.identity.id,
            });
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| IamError::LockPoisoned("log entries"))?;
        entries.push(entry);
        Ok(entries.len() - 1)
    }

    /// Snapshot of all entries in append order.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| IamError::LockPoisoned("log entries"))?;
        Ok(entries.clone())
    }

    pub fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| IamError::LockPoisoned("log entries"))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::AccessControllerOptions;
    use crate::provider::{CreateIdentityOptions, IdentityProvider};
    use tallylab_iam_core::KeyMaterial;
    use tallylab_iam_store::MemoryKeystore;

    async fn open(writers: impl FnOnce(&Identity) -> Vec<String>) -> MemoryLog<MemoryKeystore> {
        let keystore = Arc::new(MemoryKeystore::new());
        let provider = IdentityProvider::new(keystore.clone());
        let identity = provider
            .create_identity(CreateIdentityOptions::with_key_material(
                KeyMaterial::derive(None).unwrap(),
            ))
            .await
            .unwrap();
        let controller =
            AccessController::create(AccessControllerOptions::new("root", writers(&identity)))
                .unwrap();
        MemoryLog::new(controller, identity, keystore)
    }

    #[tokio::test]
    async fn test_append_allowed() {
        let log = open(|identity| vec![identity.id.clone()]).await;
        assert_eq!(log.append(&b"x"[..]).await.unwrap(), 0);
        assert_eq!(log.append(&b"y"[..]).await.unwrap(), 1);

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].payload.as_ref(), b"x");
        assert_eq!(entries[1].identity, *log.identity());
    }

    #[tokio::test]
    async fn test_append_denied_is_recoverable() {
        let log = open(|_| vec!["1,2,3".to_string()]).await;
        let err = log.append(&b"x"[..]).await.unwrap_err();
        assert!(matches!(err, IamError::AppendDenied { ref resource, .. } if resource == "root"));
        assert!(log.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_foreign_entry_denied() {
        let log = open(|identity| vec![identity.id.clone()]).await;
        let stranger = open(|identity| vec![identity.id.clone()]).await;
        let entry = Entry::new(stranger.identity().clone(), &b"x"[..]);
        assert!(matches!(
            log.append_entry(entry).await,
            Err(IamError::AppendDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_append_with_decision_timeout() {
        let keystore = Arc::new(MemoryKeystore::new());
        let provider = IdentityProvider::new(keystore.clone());
        let identity = provider
            .create_identity(CreateIdentityOptions::with_key_material(
                KeyMaterial::derive(None).unwrap(),
            ))
            .await
            .unwrap();
        let controller =
            AccessController::create(AccessControllerOptions::new("root", [identity.id.clone()]))
                .unwrap();
        let config = LogConfig {
            decision_timeout: Some(Duration::from_secs(5)),
        };
        let log = MemoryLog::with_config(controller, identity, keystore, config);
        assert_eq!(log.append(&b"x"[..]).await.unwrap(), 0);
    }
}
