//! Named references for Mango repositories.
//!
//! A reference maps a name (e.g. `"main"`) to an opaque [`RefTarget`],
//! usually a snapshot identifier or external content hash. References are
//! superseded, never removed: writing an existing name replaces its target
//! in place, and enumeration follows first-insertion order.
//!
//! # Modules
//!
//! - [`error`]: Error types for ref operations
//! - [`names`]: Ref name validation
//! - [`store`]: The insertion-ordered [`ReferenceStore`]

pub mod error;
pub mod names;
pub mod store;

pub use error::{RefError, Result};
pub use names::validate_ref_name;
pub use store::{RefTarget, ReferenceStore};
