//! Proptest generators for property-based testing.

use proptest::prelude::*;

use tallylab_iam_access::AccessPolicy;
use tallylab_iam_core::{Keypair, KeyMaterial, SEED_LEN};

/// Generate a 32-byte seed.
pub fn seed() -> impl Strategy<Value = [u8; SEED_LEN]> {
    any::<[u8; SEED_LEN]>()
}

/// Generate seeded key material.
pub fn key_material() -> impl Strategy<Value = KeyMaterial> {
    seed().prop_filter_map("derivable seed", |seed| KeyMaterial::derive(Some(&seed[..])).ok())
}

/// Generate a host keypair.
pub fn host_keypair() -> impl Strategy<Value = Keypair> {
    seed().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate message bytes of specified max length.
pub fn message(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a seed length other than 32.
pub fn bad_seed_len() -> impl Strategy<Value = usize> {
    prop_oneof![0usize..SEED_LEN, (SEED_LEN + 1)..=128]
}

/// Generate a resource name.
pub fn resource_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,31}".prop_map(String::from)
}

/// Generate an identity id: a decimal byte list of a 32-byte key.
pub fn identity_id() -> impl Strategy<Value = String> {
    any::<[u8; 32]>().prop_map(|bytes| tallylab_iam_core::to_byte_list(&bytes))
}

/// Generate a policy with up to `max_writers` writers.
pub fn policy(max_writers: usize) -> impl Strategy<Value = AccessPolicy> {
    (resource_name(), prop::collection::vec(identity_id(), 0..=max_writers))
        .prop_map(|(name, writers)| AccessPolicy::new(name, writers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallylab_iam_access::params_address;
    use tallylab_iam_core::{
        identity_signing_message, sign_identity, verify_cross_signature, verify_identity,
        CoreError, Identity, SecurityVersion,
    };

    proptest! {
        #[test]
        fn test_seeded_derivation_deterministic(seed in seed()) {
            let a = KeyMaterial::derive(Some(&seed[..])).unwrap();
            let b = KeyMaterial::derive(Some(&seed[..])).unwrap();
            prop_assert_eq!(a.security_version(), SecurityVersion::Seeded);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn test_bad_seed_length_rejected(len in bad_seed_len()) {
            let seed = vec![7u8; len];
            let err = KeyMaterial::derive(Some(&seed[..])).unwrap_err();
            prop_assert!(matches!(err, CoreError::InvalidSeedLength(n) if n == len));
        }

        #[test]
        fn test_sign_verify_round_trip(km in key_material(), msg in message(256)) {
            let sig = km.sign(&msg).unwrap();
            prop_assert!(km.signing_public_key().verify(&msg, &sig).is_ok());
        }

        #[test]
        fn test_cross_signed_identity_verifies(km in key_material(), host in host_keypair()) {
            let id = km.id();
            let public_key = host.public_key().to_hex();
            let id_signature = host.sign(id.as_bytes()).to_hex();
            let message = identity_signing_message(&public_key, &id_signature);
            let cross = sign_identity(&message, &km).unwrap().to_hex();
            let identity = Identity::new(id, public_key, id_signature, cross);

            prop_assert!(verify_identity(&identity).unwrap());
            prop_assert!(verify_cross_signature(&identity).unwrap());
        }

        #[test]
        fn test_tampered_id_fails(km in key_material(), other in key_material(), host in host_keypair()) {
            prop_assume!(km.id() != other.id());
            let id = km.id();
            let public_key = host.public_key().to_hex();
            let id_signature = host.sign(id.as_bytes()).to_hex();
            let message = identity_signing_message(&public_key, &id_signature);
            let cross = sign_identity(&message, &km).unwrap().to_hex();
            let mut identity = Identity::new(id, public_key, id_signature, cross);
            identity.id = other.id();

            prop_assert!(!verify_identity(&identity).unwrap());
        }

        #[test]
        fn test_params_address_deterministic(policy in policy(4)) {
            prop_assert_eq!(params_address(&policy).unwrap(), params_address(&policy).unwrap());
        }
    }
}
