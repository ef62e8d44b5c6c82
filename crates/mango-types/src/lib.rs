//! Foundation types for Mango repositories.
//!
//! Every other Mango crate depends on `mango-types`.
//!
//! # Key Types
//!
//! - [`Address`]: 20-byte caller / repository identity
//! - [`TxHash`]: BLAKE3 identifier of a committed operation
//! - [`INTERFACE_VERSION`]: the repository contract shape this build speaks

pub mod address;
pub mod error;
pub mod tx;
pub mod version;

pub use address::Address;
pub use error::TypeError;
pub use tx::TxHash;
pub use version::{check_interface_version, INTERFACE_VERSION};
