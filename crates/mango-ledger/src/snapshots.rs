use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerError;

/// One snapshot entry. The log never interprets its contents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotRecord(String);

impl SnapshotRecord {
    pub fn new(record: impl Into<String>) -> Self {
        Self(record.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SnapshotRecord {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SnapshotRecord {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SnapshotRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only, indexable sequence of [`SnapshotRecord`]s.
///
/// Indices start at 0 and grow by exactly one per append.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotLog {
    records: Vec<SnapshotRecord>,
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index.
    pub fn append_snapshot(&mut self, record: SnapshotRecord) -> u64 {
        let index = self.records.len() as u64;
        self.records.push(record);
        debug!(index, "snapshot appended");
        index
    }

    pub fn snapshot_count(&self) -> u64 {
        self.records.len() as u64
    }

    /// Record at `index`.
    pub fn snapshot_at(&self, index: u64) -> Result<&SnapshotRecord, LedgerError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.records.get(i))
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                count: self.snapshot_count(),
            })
    }

    /// Records in append order.
    pub fn iter(&self) -> impl Iterator<Item = &SnapshotRecord> {
        self.records.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
