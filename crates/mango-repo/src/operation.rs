//! Operations submitted to an executor and the receipts it returns.

use mango_auth::Tier;
use mango_ledger::SnapshotRecord;
use mango_refs::RefTarget;
use mango_types::{Address, TxHash};
use serde::{Deserialize, Serialize};

/// A mutating repository operation.
///
/// The caller is not part of the operation; executors receive it alongside
/// and it is bound into the resulting [`TxHash`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Create a repository administered by the caller.
    Create,
    SetObsolete {
        repo: Address,
    },
    Authorize {
        repo: Address,
        identity: Address,
        tier: Tier,
    },
    Deauthorize {
        repo: Address,
        identity: Address,
        tier: Tier,
    },
    SetRef {
        repo: Address,
        name: String,
        target: RefTarget,
    },
    AppendSnapshot {
        repo: Address,
        record: SnapshotRecord,
    },
}

impl Operation {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::SetObsolete { .. } => "set_obsolete",
            Operation::Authorize { .. } => "authorize",
            Operation::Deauthorize { .. } => "deauthorize",
            Operation::SetRef { .. } => "set_ref",
            Operation::AppendSnapshot { .. } => "append_snapshot",
        }
    }

    /// Target repository, or `None` for [`Operation::Create`].
    pub fn repo(&self) -> Option<&Address> {
        match self {
            Operation::Create => None,
            Operation::SetObsolete { repo }
            | Operation::Authorize { repo, .. }
            | Operation::Deauthorize { repo, .. }
            | Operation::SetRef { repo, .. }
            | Operation::AppendSnapshot { repo, .. } => Some(repo),
        }
    }
}

/// What a committed operation produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// A new repository was created at the receipt's `repo` address.
    Created,
    /// The operation committed; it may have been a no-op (e.g. re-authorizing).
    Applied,
    /// A snapshot was appended at `index`.
    SnapshotAppended { index: u64 },
}

/// Proof that an operation was committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Executor-wide commit sequence number, starting at 1.
    pub seq: u64,
    pub tx_hash: TxHash,
    pub repo: Address,
    pub caller: Address,
    pub outcome: Outcome,
}

impl CommitReceipt {
    /// Index of the appended snapshot, for [`Operation::AppendSnapshot`].
    pub fn snapshot_index(&self) -> Option<u64> {
        match self.outcome {
            Outcome::SnapshotAppended { index } => Some(index),
            Outcome::Created | Outcome::Applied => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_serialize_tagged() {
        let op = Operation::Authorize {
            repo: Address::from_raw([1; 20]),
            identity: Address::from_raw([2; 20]),
            tier: Tier::Committer,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "authorize");
        assert_eq!(json["tier"], "committer");
        assert_eq!(
            serde_json::to_value(Operation::Create).unwrap(),
            serde_json::json!({ "op": "create" })
        );
    }

    #[test]
    fn repo_accessor() {
        assert!(Operation::Create.repo().is_none());
        let repo = Address::from_raw([9; 20]);
        let op = Operation::AppendSnapshot {
            repo,
            record: "r".into(),
        };
        assert_eq!(op.repo(), Some(&repo));
        assert_eq!(op.name(), "append_snapshot");
    }

    #[test]
    fn receipt_json_uses_hex_identifiers() {
        let caller = Address::from_raw([3; 20]);
        let receipt = CommitReceipt {
            seq: 4,
            tx_hash: TxHash::compute(4, &caller, b"op"),
            repo: Address::from_raw([5; 20]),
            caller,
            outcome: Outcome::SnapshotAppended { index: 2 },
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["tx_hash"], receipt.tx_hash.to_hex());
        assert_eq!(json["caller"], caller.to_hex());
        assert_eq!(json["outcome"]["kind"], "snapshot_appended");

        let parsed: CommitReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, receipt);
        assert_eq!(parsed.snapshot_index(), Some(2));
    }
}
