//! The Mango repository state machine.
//!
//! A repository instance tracks named references, an append-only snapshot
//! log and a two-tier authorization registry. An instance starts `Active`
//! and may be retired exactly once into `Obsolete`, after which every write
//! is refused while reads keep working forever.
//!
//! # Architecture
//!
//! - [`RepositoryInstance`] composes [`AuthorizationRegistry`],
//!   [`ReferenceStore`] and [`SnapshotLog`] and is the only thing allowed to
//!   mutate them. Every mutating method takes the caller explicitly and
//!   performs all checks before touching state.
//! - [`Executor`] is the transactional substrate: it orders [`Operation`]s,
//!   applies each one all-or-nothing and hands out copies of committed
//!   state. [`InMemoryExecutor`] keeps state in memory; [`FileExecutor`]
//!   persists it as JSON.
//! - [`RepoHandle`] is a typed client for one repository on an executor.
//!
//! [`AuthorizationRegistry`]: mango_auth::AuthorizationRegistry
//! [`ReferenceStore`]: mango_refs::ReferenceStore
//! [`SnapshotLog`]: mango_ledger::SnapshotLog

pub mod client;
pub mod error;
pub mod executor;
pub mod file;
pub mod instance;
pub mod operation;
pub mod status;

pub use client::RepoHandle;
pub use error::{ErrorKind, RepoError, RepoResult};
pub use executor::{Executor, ExecutorState, InMemoryExecutor};
pub use file::FileExecutor;
pub use instance::RepositoryInstance;
pub use operation::{CommitReceipt, Operation, Outcome};
pub use status::{RefEntry, RepoStatus};

// Re-export the component types callers need to build operations.
pub use mango_auth::Tier;
pub use mango_ledger::SnapshotRecord;
pub use mango_refs::RefTarget;
pub use mango_types::{Address, TxHash, INTERFACE_VERSION};
