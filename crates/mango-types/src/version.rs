use crate::error::TypeError;

/// The repository interface version implemented by this build.
///
/// A repository reports the version it was created with for its whole
/// lifetime. Callers reject anything else.
pub const INTERFACE_VERSION: u32 = 1;

/// Caller-side check of a version reported by a repository.
pub fn check_interface_version(found: u32) -> Result<(), TypeError> {
    if found != INTERFACE_VERSION {
        return Err(TypeError::UnsupportedVersion {
            expected: INTERFACE_VERSION,
            found,
        });
    }
    Ok(())
}
