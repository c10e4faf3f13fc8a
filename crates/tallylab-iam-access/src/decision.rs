//! The append decision.
//!
//! An append is allowed only when, in order:
//!
//! 1. the current identity carries both signatures and both verify,
//! 2. the entry was produced by the current identity,
//! 3. the current identity is on the policy's allow-list,
//! 4. the host keystore holds a key for the entry's identity.
//!
//! The first failing check denies. Denials are `Ok(false)`, never errors; the
//! reason is only logged. Keystore failures propagate as `Err`.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use tallylab_iam_core::{verify_full, Identity, VerificationError};
use tallylab_iam_store::Keystore;

use crate::error::Result;
use crate::policy::AccessPolicy;

/// A proposed log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The identity that produced the entry.
    pub identity: Identity,
    /// Opaque entry payload.
    pub payload: Bytes,
}

impl Entry {
    pub fn new(identity: Identity, payload: impl Into<Bytes>) -> Self {
        Self {
            identity,
            payload: payload.into(),
        }
    }
}

#[derive(Debug)]
enum DenyReason {
    SignatureMismatch,
    MissingSignature,
    Malformed(VerificationError),
    IdentityMismatch,
    NotAllowListed,
    NoHostKey,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::SignatureMismatch => f.write_str("identity signature does not verify"),
            DenyReason::MissingSignature => f.write_str("identity is not cross-signed"),
            DenyReason::Malformed(e) => write!(f, "identity cannot be verified: {}", e),
            DenyReason::IdentityMismatch => f.write_str("entry identity is not the current identity"),
            DenyReason::NotAllowListed => f.write_str("identity is not on the write allow-list"),
            DenyReason::NoHostKey => f.write_str("keystore holds no key for entry identity"),
        }
    }
}

/// Decide whether `entry` may be appended under `policy`.
pub async fn can_append<K: Keystore + ?Sized>(
    entry: &Entry,
    current_identity: &Identity,
    policy: &AccessPolicy,
    keystore: &K,
) -> Result<bool> {
    match first_denial(entry, current_identity, policy, keystore).await? {
        None => Ok(true),
        Some(reason) => {
            if let DenyReason::Malformed(_) | DenyReason::MissingSignature = reason {
                tracing::warn!(id = %current_identity.id, %reason, "append denied");
            } else {
                tracing::debug!(
                    id = %entry.identity.id,
                    resource = policy.resource_name(),
                    %reason,
                    "append denied"
                );
            }
            Ok(false)
        }
    }
}

/// [`can_append`] bounded by `timeout`. Expiry denies.
pub async fn can_append_within<K: Keystore + ?Sized>(
    entry: &Entry,
    current_identity: &Identity,
    policy: &AccessPolicy,
    keystore: &K,
    timeout: Duration,
) -> Result<bool> {
    match tokio::time::timeout(timeout, can_append(entry, current_identity, policy, keystore)).await
    {
        Ok(decision) => decision,
        Err(_) => {
            tracing::debug!(id = %entry.identity.id, ?timeout, "append decision timed out");
            Ok(false)
        }
    }
}

async fn first_denial<K: Keystore + ?Sized>(
    entry: &Entry,
    current_identity: &Identity,
    policy: &AccessPolicy,
    keystore: &K,
) -> Result<Option<DenyReason>> {
    if !current_identity.has_signatures() {
        return Ok(Some(DenyReason::MissingSignature));
    }
    match verify_full(current_identity) {
        Ok(true) => {}
        Ok(false) => return Ok(Some(DenyReason::SignatureMismatch)),
        Err(e) => return Ok(Some(DenyReason::Malformed(e))),
    }

    if current_identity.id != entry.identity.id {
        return Ok(Some(DenyReason::IdentityMismatch));
    }

    if !policy.is_writer(&current_identity.id) {
        return Ok(Some(DenyReason::NotAllowListed));
    }

    if !keystore.has_key(&entry.identity.id).await? {
        return Ok(Some(DenyReason::NoHostKey));
    }

    Ok(None)
}
