//! The transactional substrate that orders and commits operations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use mango_types::{Address, TxHash};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RepoError, RepoResult};
use crate::instance::RepositoryInstance;
use crate::operation::{CommitReceipt, Operation, Outcome};

/// Commits repository operations one at a time.
///
/// Implementations must be linearizable: each `submit` is applied entirely
/// or not at all, and readers only ever see committed state. Submission
/// order across concurrent callers is not guaranteed to be commit order.
pub trait Executor: Send + Sync {
    /// Apply `op` on behalf of `caller`.
    fn submit(&self, caller: &Address, op: Operation) -> RepoResult<CommitReceipt>;

    /// Copy of the latest committed state of `repo`.
    fn state(&self, repo: &Address) -> RepoResult<RepositoryInstance>;

    /// Addresses of every repository created so far.
    fn repositories(&self) -> RepoResult<Vec<Address>>;
}

/// Committed state of a whole executor: every repository plus counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorState {
    /// Sequence number of the last commit (0 before the first).
    seq: u64,
    /// Counter mixed into new repository addresses.
    nonce: u64,
    repositories: BTreeMap<Address, RepositoryInstance>,
}

impl ExecutorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_seq(&self) -> u64 {
        self.seq
    }

    pub fn repository(&self, repo: &Address) -> RepoResult<&RepositoryInstance> {
        self.repositories
            .get(repo)
            .ok_or(RepoError::RepositoryNotFound { repo: *repo })
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.repositories.keys()
    }

    /// Apply one operation. On error nothing changes, counters included.
    pub fn apply(&mut self, caller: &Address, op: &Operation) -> RepoResult<CommitReceipt> {
        match self.apply_inner(caller, op) {
            Ok(receipt) => {
                info!(
                    seq = receipt.seq,
                    tx = %receipt.tx_hash,
                    repo = %receipt.repo,
                    op = op.name(),
                    "operation committed"
                );
                Ok(receipt)
            }
            Err(e) => {
                warn!(
                    caller = %caller,
                    op = op.name(),
                    kind = %e.kind(),
                    error = %e,
                    "operation rejected"
                );
                Err(e)
            }
        }
    }

    fn apply_inner(&mut self, caller: &Address, op: &Operation) -> RepoResult<CommitReceipt> {
        let payload = serde_json::to_vec(op)?;

        let (repo, outcome) = match op {
            Operation::Create => {
                let repo = self.next_repo_address(caller);
                self.repositories
                    .insert(repo, RepositoryInstance::create(*caller));
                info!(repo = %repo, admin = %caller, "repository created");
                (repo, Outcome::Created)
            }
            Operation::SetObsolete { repo } => {
                self.transact(repo, |r| r.set_obsolete(caller))?;
                (*repo, Outcome::Applied)
            }
            Operation::Authorize {
                repo,
                identity,
                tier,
            } => {
                self.transact(repo, |r| r.authorize(caller, *identity, *tier))?;
                (*repo, Outcome::Applied)
            }
            Operation::Deauthorize {
                repo,
                identity,
                tier,
            } => {
                self.transact(repo, |r| r.deauthorize(caller, identity, *tier))?;
                (*repo, Outcome::Applied)
            }
            Operation::SetRef { repo, name, target } => {
                self.transact(repo, |r| r.set_ref(caller, name, target.clone()))?;
                (*repo, Outcome::Applied)
            }
            Operation::AppendSnapshot { repo, record } => {
                let index = self.transact(repo, |r| r.append_snapshot(caller, record.clone()))?;
                (*repo, Outcome::SnapshotAppended { index })
            }
        };

        self.seq += 1;
        Ok(CommitReceipt {
            seq: self.seq,
            tx_hash: TxHash::compute(self.seq, caller, &payload),
            repo,
            caller: *caller,
            outcome,
        })
    }

    /// Run `f` against a copy of `repo` and publish the copy only on success.
    fn transact<T>(
        &mut self,
        repo: &Address,
        f: impl FnOnce(&mut RepositoryInstance) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut working = self.repository(repo)?.clone();
        let value = f(&mut working)?;
        self.repositories.insert(*repo, working);
        Ok(value)
    }

    fn next_repo_address(&mut self, creator: &Address) -> Address {
        loop {
            let mut seed = Vec::with_capacity(5 + 20 + 8);
            seed.extend_from_slice(b"repo:");
            seed.extend_from_slice(creator.as_bytes());
            seed.extend_from_slice(&self.nonce.to_be_bytes());
            self.nonce += 1;
            let candidate = Address::derive(&seed);
            if !self.repositories.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

/// In-memory [`Executor`] for tests, embedding and short-lived processes.
///
/// Committed state lives behind an [`ArcSwap`]. Readers load the current
/// snapshot without locking and never wait on a writer. Writers are
/// serialized by a mutex, apply each operation to a private copy and
/// publish the copy with a single atomic store when it commits.
pub struct InMemoryExecutor {
    current: ArcSwap<ExecutorState>,
    writer: Mutex<()>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously committed state.
    pub fn from_state(state: ExecutorState) -> Self {
        Self {
            current: ArcSwap::from_pointee(state),
            writer: Mutex::new(()),
        }
    }

    /// Copy of the whole committed state.
    pub fn snapshot(&self) -> ExecutorState {
        ExecutorState::clone(&self.current.load())
    }
}

impl Default for InMemoryExecutor {
    fn default() -> Self {
        Self::from_state(ExecutorState::new())
    }
}

impl fmt::Debug for InMemoryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.current.load();
        f.debug_struct("InMemoryExecutor")
            .field("seq", &state.last_seq())
            .field("repositories", &state.repositories.len())
            .finish()
    }
}

impl Executor for InMemoryExecutor {
    fn submit(&self, caller: &Address, op: Operation) -> RepoResult<CommitReceipt> {
        let _guard = self
            .writer
            .lock()
            .map_err(|_| RepoError::poisoned("executor"))?;
        let mut next = ExecutorState::clone(&self.current.load());
        let receipt = next.apply(caller, &op)?;
        self.current.store(Arc::new(next));
        Ok(receipt)
    }

    fn state(&self, repo: &Address) -> RepoResult<RepositoryInstance> {
        self.current.load().repository(repo).cloned()
    }

    fn repositories(&self) -> RepoResult<Vec<Address>> {
        Ok(self.current.load().addresses().copied().collect())
    }
}
