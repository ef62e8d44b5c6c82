//! Authorization for Mango repositories.
//!
//! A repository has two privilege tiers:
//!
//! - **Administrators** may change who is authorized and may retire the
//!   repository. The administrator set is never empty.
//! - **Committers** may move references and append snapshots.
//!
//! Administrators always pass committer-tier checks.
//!
//! # Modules
//!
//! - [`error`]: [`AuthError`]
//! - [`tier`]: the [`Tier`] enum
//! - [`registry`]: the [`AuthorizationRegistry`]

pub mod error;
pub mod registry;
pub mod tier;

pub use error::{AuthError, Result};
pub use registry::AuthorizationRegistry;
pub use tier::Tier;
