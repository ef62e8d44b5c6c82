//! Append-only snapshot log for Mango repositories.
//!
//! Snapshots are opaque records (content identifiers or metadata blobs).
//! Once appended, a record keeps its index forever: there is no update and
//! no delete.

pub mod error;
pub mod snapshots;

pub use error::LedgerError;
pub use snapshots::{SnapshotLog, SnapshotRecord};
