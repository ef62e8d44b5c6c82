use std::fmt;

use mango_auth::AuthError;
use mango_ledger::LedgerError;
use mango_refs::RefError;
use mango_types::Address;
use thiserror::Error;

/// Errors surfaced by repository operations and executors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Ref(#[from] RefError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A write was attempted on a retired repository.
    #[error("repository is obsolete")]
    Obsolete,

    /// The executor knows no repository at this address.
    #[error("repository not found: {repo}")]
    RepositoryNotFound { repo: Address },

    /// The repository speaks a contract shape this build does not.
    #[error("not a supported Mango repository: interface version {found}, expected {expected}")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Coarse classification of a [`RepoError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Obsolete,
    LastAdmin,
    InvalidName,
    NotFound,
    Index,
    UnsupportedVersion,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Obsolete => "obsolete",
            ErrorKind::LastAdmin => "last-admin",
            ErrorKind::InvalidName => "invalid-name",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Index => "index",
            ErrorKind::UnsupportedVersion => "unsupported-version",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::Auth(AuthError::Unauthorized { .. }) => ErrorKind::Unauthorized,
            RepoError::Auth(AuthError::LastAdmin { .. }) => ErrorKind::LastAdmin,
            RepoError::Auth(AuthError::NoAdministrators) => ErrorKind::Storage,
            RepoError::Ref(RefError::InvalidName { .. }) => ErrorKind::InvalidName,
            RepoError::Ref(RefError::NotFound { .. }) => ErrorKind::NotFound,
            RepoError::Ref(RefError::IndexOutOfRange { .. }) => ErrorKind::Index,
            RepoError::Ledger(LedgerError::IndexOutOfRange { .. }) => ErrorKind::Index,
            RepoError::Obsolete => ErrorKind::Obsolete,
            RepoError::RepositoryNotFound { .. } => ErrorKind::NotFound,
            RepoError::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            RepoError::Storage(_) | RepoError::Io(_) | RepoError::Serialization(_) => {
                ErrorKind::Storage
            }
        }
    }

    /// Storage-level lock poisoning.
    pub(crate) fn poisoned(what: &str) -> Self {
        RepoError::Storage(format!("{what} lock poisoned"))
    }
}
