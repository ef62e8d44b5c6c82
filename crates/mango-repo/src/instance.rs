//! The repository controller.

use mango_auth::{AuthorizationRegistry, Tier};
use mango_ledger::{SnapshotLog, SnapshotRecord};
use mango_refs::{RefTarget, ReferenceStore};
use mango_types::{Address, INTERFACE_VERSION};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RepoError, RepoResult};
use crate::status::{RefEntry, RepoStatus};

/// One versioned, access-controlled repository.
///
/// All writes go through the methods below, which take the caller
/// explicitly and check permission, then obsolescence, then the
/// operation's own preconditions before changing anything. A failed call
/// leaves the instance exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInstance {
    interface_version: u32,
    obsolete: bool,
    authorization: AuthorizationRegistry,
    references: ReferenceStore,
    snapshots: SnapshotLog,
}

impl RepositoryInstance {
    /// Create an active repository administered by `initial_admin`.
    pub fn create(initial_admin: Address) -> Self {
        Self {
            interface_version: INTERFACE_VERSION,
            obsolete: false,
            authorization: AuthorizationRegistry::new(initial_admin),
            references: ReferenceStore::new(),
            snapshots: SnapshotLog::new(),
        }
    }

    // ---- Reads ----

    /// The interface version fixed at creation.
    pub fn interface_version(&self) -> u32 {
        self.interface_version
    }

    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn is_admin(&self, identity: &Address) -> bool {
        self.authorization.is_admin(identity)
    }

    pub fn is_committer(&self, identity: &Address) -> bool {
        self.authorization.is_committer(identity)
    }

    pub fn ref_count(&self) -> usize {
        self.references.ref_count()
    }

    pub fn ref_name(&self, index: usize) -> RepoResult<&str> {
        Ok(self.references.ref_name_at(index)?)
    }

    pub fn get_ref(&self, name: &str) -> RepoResult<&RefTarget> {
        Ok(self.references.get_ref(name)?)
    }

    pub fn snapshot_count(&self) -> u64 {
        self.snapshots.snapshot_count()
    }

    pub fn get_snapshot(&self, index: u64) -> RepoResult<&SnapshotRecord> {
        Ok(self.snapshots.snapshot_at(index)?)
    }

    pub fn authorization(&self) -> &AuthorizationRegistry {
        &self.authorization
    }

    /// Full status report.
    pub fn status(&self) -> RepoStatus {
        RepoStatus {
            interface_version: self.interface_version,
            obsolete: self.obsolete,
            administrators: self.authorization.administrators().copied().collect(),
            committers: self.authorization.committers().copied().collect(),
            refs: self
                .references
                .iter()
                .map(|(name, target)| RefEntry {
                    name: name.to_string(),
                    target: target.clone(),
                })
                .collect(),
            snapshots: self.snapshots.iter().cloned().collect(),
        }
    }

    // ---- Writes ----

    /// Retire the repository. Admin only; repeating it is a silent success.
    pub fn set_obsolete(&mut self, caller: &Address) -> RepoResult<()> {
        self.authorization.check_permission(caller, Tier::Admin)?;
        if !self.obsolete {
            self.obsolete = true;
            info!(caller = %caller, "repository marked obsolete");
        }
        Ok(())
    }

    /// Grant `tier` to `identity`. Returns `false` if it already held it.
    pub fn authorize(
        &mut self,
        caller: &Address,
        identity: Address,
        tier: Tier,
    ) -> RepoResult<bool> {
        self.writable(caller, Tier::Admin)?;
        let added = self.authorization.authorize(identity, tier);
        info!(caller = %caller, identity = %identity, tier = %tier, added, "authorized");
        Ok(added)
    }

    /// Revoke `tier` from `identity`. Returns `false` if it did not hold it.
    pub fn deauthorize(
        &mut self,
        caller: &Address,
        identity: &Address,
        tier: Tier,
    ) -> RepoResult<bool> {
        self.writable(caller, Tier::Admin)?;
        let removed = self.authorization.deauthorize(identity, tier)?;
        info!(caller = %caller, identity = %identity, tier = %tier, removed, "deauthorized");
        Ok(removed)
    }

    /// Point `name` at `target`, creating the ref if needed.
    pub fn set_ref(
        &mut self,
        caller: &Address,
        name: &str,
        target: RefTarget,
    ) -> RepoResult<Option<RefTarget>> {
        self.writable(caller, Tier::Committer)?;
        let previous = self.references.set_ref(name, target)?;
        info!(caller = %caller, name, created = previous.is_none(), "ref updated");
        Ok(previous)
    }

    /// Append a snapshot and return its index.
    pub fn append_snapshot(
        &mut self,
        caller: &Address,
        record: SnapshotRecord,
    ) -> RepoResult<u64> {
        self.writable(caller, Tier::Committer)?;
        let index = self.snapshots.append_snapshot(record);
        info!(caller = %caller, index, "snapshot recorded");
        Ok(index)
    }

    /// Gate shared by every write except [`Self::set_obsolete`].
    fn writable(&self, caller: &Address, tier: Tier) -> RepoResult<()> {
        self.authorization.check_permission(caller, tier)?;
        if self.obsolete {
            return Err(RepoError::Obsolete);
        }
        Ok(())
    }
}
