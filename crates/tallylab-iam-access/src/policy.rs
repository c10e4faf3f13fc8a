//! Static write policies.

use crate::error::{AccessError, Result};
use crate::manifest::{AccessControllerParams, ACCESS_CONTROLLER_TYPE};

/// Who may write to a resource.
///
/// Fixed at construction. Membership is exact string equality on identity
/// ids; there are no wildcards and no grant/revoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    resource_name: String,
    write_allow_list: Vec<String>,
}

impl AccessPolicy {
    /// Create a policy for `resource_name`. Writers keep the order supplied.
    pub fn new<I, S>(resource_name: impl Into<String>, writers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource_name: resource_name.into(),
            write_allow_list: writers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn write_allow_list(&self) -> &[String] {
        &self.write_allow_list
    }

    /// Check if `id` is on the allow-list.
    pub fn is_writer(&self, id: &str) -> bool {
        self.write_allow_list.iter().any(|w| w == id)
    }

    /// The persisted form of this policy.
    pub fn to_params(&self) -> AccessControllerParams {
        AccessControllerParams {
            name: self.resource_name.clone(),
            kind: ACCESS_CONTROLLER_TYPE.to_string(),
            write: self.write_allow_list.clone(),
        }
    }

    /// Rebuild a policy from its persisted form.
    pub fn from_params(params: AccessControllerParams) -> Result<Self> {
        if params.kind != ACCESS_CONTROLLER_TYPE {
            return Err(AccessError::InvalidManifest(format!(
                "expected access controller type {:?}, got {:?}",
                ACCESS_CONTROLLER_TYPE, params.kind
            )));
        }
        Ok(Self {
            resource_name: params.name,
            write_allow_list: params.write,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_membership_is_exact() {
        let policy = AccessPolicy::new("root", ["1,2,3"]);
        assert!(policy.is_writer("1,2,3"));
        assert!(!policy.is_writer("1,2"));
        assert!(!policy.is_writer("1,2,3,"));
        assert!(!policy.is_writer("*"));
    }

    #[test]
    fn test_params_round_trip() {
        let policy = AccessPolicy::new("root", ["b", "a"]);
        let params = policy.to_params();
        assert_eq!(params.kind, "tallylab");
        assert_eq!(params.write, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(AccessPolicy::from_params(params).unwrap(), policy);
    }

    #[test]
    fn test_from_params_rejects_foreign_type() {
        let mut params = AccessPolicy::new("root", ["a"]).to_params();
        params.kind = "ipfs".into();
        assert!(matches!(
            AccessPolicy::from_params(params),
            Err(AccessError::InvalidManifest(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_is_writer_matches_membership(
            writers in proptest::collection::vec("[0-9,]{1,12}", 0..8),
            candidate in "[0-9,]{1,12}",
        ) {
            let policy = AccessPolicy::new("root", writers.clone());
            prop_assert_eq!(policy.is_writer(&candidate), writers.contains(&candidate));
        }
    }
}
