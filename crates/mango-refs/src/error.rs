//! Error types for reference operations.

use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefError {
    /// The reference was not found.
    #[error("ref not found: {name}")]
    NotFound { name: String },

    /// The ref name is empty or malformed.
    #[error("invalid ref name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// An enumeration index is past the end of the table.
    #[error("ref index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
