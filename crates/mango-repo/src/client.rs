//! Typed client for one repository on an [`Executor`].

use mango_auth::Tier;
use mango_ledger::SnapshotRecord;
use mango_refs::RefTarget;
use mango_types::Address;

use crate::error::RepoResult;
use crate::executor::Executor;
use crate::operation::{CommitReceipt, Operation};
use crate::status::RepoStatus;

/// Handle on one repository.
///
/// Every write names its caller explicitly; there is no ambient "current
/// account". Reads go to the executor's committed state each time.
pub struct RepoHandle<'a, E: Executor + ?Sized> {
    executor: &'a E,
    repo: Address,
}

impl<'a, E: Executor + ?Sized> RepoHandle<'a, E> {
    /// Create a new repository administered by `admin`.
    pub fn create(executor: &'a E, admin: &Address) -> RepoResult<(Self, CommitReceipt)> {
        let receipt = executor.submit(admin, Operation::Create)?;
        let handle = Self {
            executor,
            repo: receipt.repo,
        };
        Ok((handle, receipt))
    }

    /// Attach to an existing repository, rejecting unknown addresses and
    /// unsupported interface versions.
    pub fn open(executor: &'a E, repo: Address) -> RepoResult<Self> {
        executor.state(&repo)?.status().ensure_supported()?;
        Ok(Self { executor, repo })
    }

    pub fn address(&self) -> &Address {
        &self.repo
    }

    // ---- Reads ----

    pub fn status(&self) -> RepoResult<RepoStatus> {
        Ok(self.executor.state(&self.repo)?.status())
    }

    pub fn interface_version(&self) -> RepoResult<u32> {
        Ok(self.executor.state(&self.repo)?.interface_version())
    }

    pub fn is_obsolete(&self) -> RepoResult<bool> {
        Ok(self.executor.state(&self.repo)?.is_obsolete())
    }

    pub fn is_admin(&self, identity: &Address) -> RepoResult<bool> {
        Ok(self.executor.state(&self.repo)?.is_admin(identity))
    }

    pub fn is_committer(&self, identity: &Address) -> RepoResult<bool> {
        Ok(self.executor.state(&self.repo)?.is_committer(identity))
    }

    pub fn ref_count(&self) -> RepoResult<usize> {
        Ok(self.executor.state(&self.repo)?.ref_count())
    }

    /// Name of the ref at `index` in enumeration order.
    pub fn ref_name(&self, index: usize) -> RepoResult<String> {
        Ok(self.executor.state(&self.repo)?.ref_name(index)?.to_string())
    }

    pub fn get_ref(&self, name: &str) -> RepoResult<RefTarget> {
        Ok(self.executor.state(&self.repo)?.get_ref(name)?.clone())
    }

    pub fn snapshot_count(&self) -> RepoResult<u64> {
        Ok(self.executor.state(&self.repo)?.snapshot_count())
    }

    pub fn get_snapshot(&self, index: u64) -> RepoResult<SnapshotRecord> {
        Ok(self.executor.state(&self.repo)?.get_snapshot(index)?.clone())
    }

    // ---- Writes ----

    pub fn set_obsolete(&self, caller: &Address) -> RepoResult<CommitReceipt> {
        self.executor
            .submit(caller, Operation::SetObsolete { repo: self.repo })
    }

    pub fn authorize(
        &self,
        caller: &Address,
        identity: Address,
        tier: Tier,
    ) -> RepoResult<CommitReceipt> {
        self.executor.submit(
            caller,
            Operation::Authorize {
                repo: self.repo,
                identity,
                tier,
            },
        )
    }

    pub fn deauthorize(
        &self,
        caller: &Address,
        identity: Address,
        tier: Tier,
    ) -> RepoResult<CommitReceipt> {
        self.executor.submit(
            caller,
            Operation::Deauthorize {
                repo: self.repo,
                identity,
                tier,
            },
        )
    }

    pub fn set_ref(
        &self,
        caller: &Address,
        name: impl Into<String>,
        target: impl Into<RefTarget>,
    ) -> RepoResult<CommitReceipt> {
        self.executor.submit(
            caller,
            Operation::SetRef {
                repo: self.repo,
                name: name.into(),
                target: target.into(),
            },
        )
    }

    /// Append a snapshot; the new index is in the receipt's outcome.
    pub fn append_snapshot(
        &self,
        caller: &Address,
        record: impl Into<SnapshotRecord>,
    ) -> RepoResult<CommitReceipt> {
        self.executor.submit(
            caller,
            Operation::AppendSnapshot {
                repo: self.repo,
                record: record.into(),
            },
        )
    }
}
