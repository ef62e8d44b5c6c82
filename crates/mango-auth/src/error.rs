//! Error types for authorization checks.

use mango_types::Address;
use thiserror::Error;

use crate::tier::Tier;

/// Errors that can occur during authorization operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The caller does not hold the required tier.
    #[error("{identity} is not authorized as {required}")]
    Unauthorized { identity: Address, required: Tier },

    /// The operation would leave the repository without an administrator.
    #[error("cannot remove {identity}: it is the last administrator")]
    LastAdmin { identity: Address },

    /// A stored registry has no administrators.
    #[error("authorization registry has no administrators")]
    NoAdministrators,
}

/// Convenience type alias for authorization operations.
pub type Result<T> = std::result::Result<T, AuthError>;
