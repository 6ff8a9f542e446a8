//! Channel detection shared by every version scheme

use tracing::trace;

use crate::version::error::{Error, Result};
use crate::version::version_type::VersionType;

/// Picks the one channel whose condition holds.
///
/// `candidates` pairs each channel with whether the version satisfies it. More than
/// one satisfied condition, or none at all, means the grammar and the detection
/// logic disagree.
pub fn find_version_type(version: &str, candidates: &[(VersionType, bool)]) -> Result<VersionType> {
    let mut found: Option<VersionType> = None;

    for &(candidate, matches) in candidates {
        if !matches {
            continue;
        }
        if let Some(first) = found {
            return Err(Error::TooManyTypes {
                version: version.to_string(),
                first,
                second: candidate,
            });
        }
        found = Some(candidate);
    }

    let version_type = found.ok_or_else(|| Error::NoVersionType(version.to_string()))?;
    trace!("Detected channel '{}' for {}", version_type, version);
    Ok(version_type)
}
