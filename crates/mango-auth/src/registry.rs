//! The administrator / committer registry of one repository.

use std::collections::BTreeSet;

use mango_types::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, Result};
use crate::tier::Tier;

/// Tracks who may mutate one repository.
///
/// The administrator set is non-empty from construction onwards; every
/// mutation that would empty it is rejected, and a stored registry with no
/// administrators fails to deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistryRepr")]
pub struct AuthorizationRegistry {
    administrators: BTreeSet<Address>,
    committers: BTreeSet<Address>,
}

/// Unchecked wire form of [`AuthorizationRegistry`].
#[derive(Deserialize)]
struct RegistryRepr {
    administrators: BTreeSet<Address>,
    #[serde(default)]
    committers: BTreeSet<Address>,
}

impl TryFrom<RegistryRepr> for AuthorizationRegistry {
    type Error = AuthError;

    fn try_from(repr: RegistryRepr) -> Result<Self> {
        if repr.administrators.is_empty() {
            return Err(AuthError::NoAdministrators);
        }
        Ok(Self {
            administrators: repr.administrators,
            committers: repr.committers,
        })
    }
}

impl AuthorizationRegistry {
    /// Create a registry whose only member is `initial_admin`.
    pub fn new(initial_admin: Address) -> Self {
        Self {
            administrators: BTreeSet::from([initial_admin]),
            committers: BTreeSet::new(),
        }
    }

    /// Returns `true` if `identity` is an administrator.
    pub fn is_admin(&self, identity: &Address) -> bool {
        self.administrators.contains(identity)
    }

    /// Returns `true` if `identity` was explicitly authorized as a committer.
    ///
    /// Administrators are not reported here; use [`Self::has_tier`] for
    /// permission decisions.
    pub fn is_committer(&self, identity: &Address) -> bool {
        self.committers.contains(identity)
    }

    /// Returns `true` if `identity` passes a check for `tier`.
    pub fn has_tier(&self, identity: &Address, tier: Tier) -> bool {
        match tier {
            Tier::Admin => self.is_admin(identity),
            Tier::Committer => self.is_admin(identity) || self.is_committer(identity),
        }
    }

    /// Fail with [`AuthError::Unauthorized`] unless `identity` holds `required`.
    pub fn check_permission(&self, identity: &Address, required: Tier) -> Result<()> {
        let granted = self.has_tier(identity, required);
        debug!(identity = %identity, required = %required, granted, "permission check");
        if granted {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                identity: *identity,
                required,
            })
        }
    }

    /// Add `identity` to `tier`.
    ///
    /// Returns `false` when it was already a member (a no-op success).
    pub fn authorize(&mut self, identity: Address, tier: Tier) -> bool {
        match tier {
            Tier::Admin => self.administrators.insert(identity),
            Tier::Committer => self.committers.insert(identity),
        }
    }

    /// Remove `identity` from `tier`.
    ///
    /// Returns `Ok(false)` when it was not a member. Removing the last
    /// administrator fails with [`AuthError::LastAdmin`] and changes nothing.
    pub fn deauthorize(&mut self, identity: &Address, tier: Tier) -> Result<bool> {
        match tier {
            Tier::Admin => {
                if !self.administrators.contains(identity) {
                    return Ok(false);
                }
                if self.administrators.len() == 1 {
                    return Err(AuthError::LastAdmin {
                        identity: *identity,
                    });
                }
                Ok(self.administrators.remove(identity))
            }
            Tier::Committer => Ok(self.committers.remove(identity)),
        }
    }

    /// Administrators in address order.
    pub fn administrators(&self) -> impl Iterator<Item = &Address> {
        self.administrators.iter()
    }

    /// Explicit committers in address order.
    pub fn committers(&self) -> impl Iterator<Item = &Address> {
        self.committers.iter()
    }

    /// Number of administrators. Always at least one.
    pub fn admin_count(&self) -> usize {
        self.administrators.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(label: &str) -> Address {
        Address::derive(label.as_bytes())
    }

    #[test]
    fn creator_is_sole_admin() {
        let reg = AuthorizationRegistry::new(addr("alice"));
        assert!(reg.is_admin(&addr("alice")));
        assert!(!reg.is_committer(&addr("alice")));
        assert_eq!(reg.admin_count(), 1);
        assert_eq!(reg.committers().count(), 0);
    }

    #[test]
    fn admin_passes_committer_checks() {
        let reg = AuthorizationRegistry::new(addr("alice"));
        assert!(reg.check_permission(&addr("alice"), Tier::Committer).is_ok());
        assert!(reg.check_permission(&addr("alice"), Tier::Admin).is_ok());
    }

    #[test]
    fn committer_fails_admin_checks() {
        let mut reg = AuthorizationRegistry::new(addr("alice"));
        reg.authorize(addr("bob"), Tier::Committer);

        assert!(reg.check_permission(&addr("bob"), Tier::Committer).is_ok());
        let err = reg.check_permission(&addr("bob"), Tier::Admin).unwrap_err();
        assert_eq!(
            err,
            AuthError::Unauthorized {
                identity: addr("bob"),
                required: Tier::Admin
            }
        );
    }

    #[test]
    fn stranger_is_unauthorized() {
        let reg = AuthorizationRegistry::new(addr("alice"));
        let err = reg
            .check_permission(&addr("mallory"), Tier::Committer)
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[test]
    fn authorize_is_idempotent() {
        let mut reg = AuthorizationRegistry::new(addr("alice"));
        assert!(reg.authorize(addr("bob"), Tier::Committer));
        let before = reg.clone();
        assert!(!reg.authorize(addr("bob"), Tier::Committer));
        assert_eq!(reg, before);

        assert!(!reg.authorize(addr("alice"), Tier::Admin));
        assert_eq!(reg.admin_count(), 1);
    }

    #[test]
    fn cannot_remove_last_admin() {
        let mut reg = AuthorizationRegistry::new(addr("alice"));
        let err = reg.deauthorize(&addr("alice"), Tier::Admin).unwrap_err();
        assert_eq!(
            err,
            AuthError::LastAdmin {
                identity: addr("alice")
            }
        );
        assert!(reg.is_admin(&addr("alice")));
    }

    #[test]
    fn admin_can_be_removed_once_replaced() {
        let mut reg = AuthorizationRegistry::new(addr("alice"));
        reg.authorize(addr("bob"), Tier::Admin);
        assert!(reg.deauthorize(&addr("alice"), Tier::Admin).unwrap());
        assert!(!reg.is_admin(&addr("alice")));
        assert!(reg.is_admin(&addr("bob")));

        let err = reg.deauthorize(&addr("bob"), Tier::Admin).unwrap_err();
        assert!(matches!(err, AuthError::LastAdmin { .. }));
    }

    #[test]
    fn deauthorize_non_member_is_noop() {
        let mut reg = AuthorizationRegistry::new(addr("alice"));
        assert!(!reg.deauthorize(&addr("bob"), Tier::Committer).unwrap());
        assert!(!reg.deauthorize(&addr("bob"), Tier::Admin).unwrap());
    }

    #[test]
    fn tiers_are_removed_independently() {
        let mut reg = AuthorizationRegistry::new(addr("alice"));
        reg.authorize(addr("bob"), Tier::Admin);
        reg.authorize(addr("bob"), Tier::Committer);

        assert!(reg.deauthorize(&addr("bob"), Tier::Committer).unwrap());
        assert!(reg.is_admin(&addr("bob")));
        assert!(!reg.is_committer(&addr("bob")));
        assert!(reg.has_tier(&addr("bob"), Tier::Committer));
    }

    #[test]
    fn serde_roundtrip_and_empty_admins_rejected() {
        let mut reg = AuthorizationRegistry::new(addr("alice"));
        reg.authorize(addr("bob"), Tier::Committer);
        let json = serde_json::to_string(&reg).unwrap();
        let parsed: AuthorizationRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reg);

        let tampered = r#"{"administrators":[],"committers":[]}"#;
        assert!(serde_json::from_str::<AuthorizationRegistry>(tampered).is_err());
    }

    proptest! {
        // Any sequence of tier changes keeps at least one administrator.
        #[test]
        fn administrators_never_empty(ops in proptest::collection::vec((0u8..4, any::<bool>(), any::<bool>()), 0..64)) {
            let mut reg = AuthorizationRegistry::new(Address::from_raw([0; 20]));
            for (who, admin, add) in ops {
                let identity = Address::from_raw([who; 20]);
                let tier = if admin { Tier::Admin } else { Tier::Committer };
                if add {
                    reg.authorize(identity, tier);
                } else {
                    let _ = reg.deauthorize(&identity, tier);
                }
                prop_assert!(reg.admin_count() >= 1);
                for a in reg.administrators() {
                    prop_assert!(reg.has_tier(a, Tier::Committer));
                }
            }
        }
    }
}
