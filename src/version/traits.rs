//! Capabilities shared by every version scheme

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::version::error::{Error, Result};
use crate::version::numbers::{NumberField, optional_difference};
use crate::version::version_type::VersionType;

/// A parsed, validated version number
///
/// Implementations are immutable: bumping returns a new value.
pub trait Version: fmt::Display + FromStr<Err = Error> + Send + Sync + Sized {
    fn major_number(&self) -> u64;

    fn minor_number(&self) -> u64;

    fn patch_number(&self) -> Option<u64>;

    /// Returns the value of `field`, or `None` if this version does not define it
    fn number(&self, field: NumberField) -> Option<u64>;

    /// Compare this version with another one
    ///
    /// Returns a negative number if `self` precedes `other`, zero if they are equivalent
    /// and a positive number otherwise. The magnitude is the difference of the first
    /// field that differs.
    fn compare(&self, other: &Self) -> i64;

    /// Returns a new version with `field` incremented and the less significant fields reset
    fn bump(&self, field: NumberField) -> Result<Self>;

    /// Same as [`Version::bump`], with the field given by name (e.g. `"minor_number"`)
    fn bump_field(&self, field: &str) -> Result<Self> {
        let Ok(field) = field.parse::<NumberField>() else {
            return Err(Error::invalid_bump(self, field, "unknown field"));
        };
        self.bump(field)
    }

    /// Compare with a version given as a string, parsed with the same scheme
    fn compare_str(&self, other: &str) -> Result<i64> {
        let other = other.parse::<Self>().map_err(|e| {
            warn!("Failed to parse version '{}' for comparison: {}", other, e);
            Error::InvalidComparison {
                version: self.to_string(),
                other: other.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(self.compare(&other))
    }

    /// `self`'s number minus `other`'s number for `field`, undefined numbers counting as 0
    fn subtract_other_number_from_this_number(&self, other: &Self, field: NumberField) -> i64 {
        optional_difference(self.number(field), other.number(field))
    }
}

/// Channel classification of a version
pub trait ReleaseChannel {
    fn version_type(&self) -> VersionType;

    fn is_nightly(&self) -> bool {
        self.version_type().is_same_variant(VersionType::Nightly)
    }

    fn is_aurora_or_devedition(&self) -> bool {
        self.version_type()
            .is_same_variant(VersionType::AuroraOrDevedition)
    }

    fn is_beta(&self) -> bool {
        self.version_type().is_same_variant(VersionType::Beta)
    }

    fn is_release_candidate(&self) -> bool {
        self.version_type()
            .is_same_variant(VersionType::ReleaseCandidate)
    }

    fn is_release(&self) -> bool {
        self.version_type().is_same_variant(VersionType::Release)
    }

    fn is_esr(&self) -> bool {
        self.version_type().is_same_variant(VersionType::Esr)
    }

    /// Pre-release builds: nightly, aurora, beta and release candidates
    fn is_development(&self) -> bool {
        matches!(
            self.version_type(),
            VersionType::Nightly
                | VersionType::AuroraOrDevedition
                | VersionType::Beta
                | VersionType::ReleaseCandidate
        )
    }
}
