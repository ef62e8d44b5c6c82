/// Errors produced by snapshot log operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("snapshot index {index} out of range (count {count})")]
    IndexOutOfRange { index: u64, count: u64 },
}
