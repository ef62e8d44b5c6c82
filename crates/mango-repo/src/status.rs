//! Read-only status report of one repository.

use mango_ledger::SnapshotRecord;
use mango_refs::RefTarget;
use mango_types::{check_interface_version, Address, TypeError};
use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

/// A named reference as reported by [`RepoStatus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefEntry {
    pub name: String,
    pub target: RefTarget,
}

/// Everything a client needs to inspect a repository.
///
/// The repository always reports its version truthfully; deciding whether
/// that version is acceptable is up to the caller, via
/// [`RepoStatus::ensure_supported`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStatus {
    pub interface_version: u32,
    pub obsolete: bool,
    pub administrators: Vec<Address>,
    pub committers: Vec<Address>,
    /// References in enumeration order.
    pub refs: Vec<RefEntry>,
    /// Snapshots in index order.
    pub snapshots: Vec<SnapshotRecord>,
}

impl RepoStatus {
    /// Fail with [`RepoError::UnsupportedVersion`] unless this build
    /// understands the reported interface version.
    pub fn ensure_supported(&self) -> RepoResult<()> {
        check_interface_version(self.interface_version).map_err(|e| match e {
            TypeError::UnsupportedVersion { expected, found } => {
                RepoError::UnsupportedVersion { expected, found }
            }
            other => RepoError::Storage(other.to_string()),
        })
    }
}
