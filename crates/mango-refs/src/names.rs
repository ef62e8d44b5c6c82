//! Ref name validation.
//!
//! Valid ref names:
//! - Must be non-empty
//! - Must not contain control characters
//! - Must not start or end with whitespace

use crate::error::{RefError, Result};

/// Validate a ref name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use mango_refs::names::validate_ref_name;
///
/// assert!(validate_ref_name("main").is_ok());
/// assert!(validate_ref_name("release/1.0").is_ok());
/// assert!(validate_ref_name("").is_err());
/// ```
pub fn validate_ref_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "ref name must not be empty"));
    }

    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(invalid(name, &format!("contains control character {ch:?}")));
    }

    if name.trim() != name {
        return Err(invalid(name, "must not start or end with whitespace"));
    }

    Ok(())
}

fn invalid(name: &str, reason: &str) -> RefError {
    RefError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
