//! Release channels and their ordering

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Channel a version ships on.
///
/// Channels compare by rank. `Release` and `Esr` share a rank because `60.0.1` and
/// `60.0.1esr` are built from the same code, so `VersionType::Esr == VersionType::Release`.
/// Use [`VersionType::is_same_variant`] to tell the two tags apart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Nightly,
    AuroraOrDevedition,
    Beta,
    ReleaseCandidate,
    Release,
    Esr,
}

impl VersionType {
    pub const fn rank(self) -> i32 {
        match self {
            VersionType::Nightly => 1,
            VersionType::AuroraOrDevedition => 2,
            VersionType::Beta => 3,
            VersionType::ReleaseCandidate => 4,
            VersionType::Release | VersionType::Esr => 5,
        }
    }

    /// Rank difference: negative if `self` precedes `other`, zero if they share a rank.
    ///
    /// Only the sign is stable. The magnitude follows the values of [`VersionType::rank`].
    pub fn compare(self, other: VersionType) -> i32 {
        self.rank() - other.rank()
    }

    /// Tag identity, which unlike `==` tells `Release` and `Esr` apart
    pub fn is_same_variant(self, other: VersionType) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Nightly => "nightly",
            VersionType::AuroraOrDevedition => "aurora_or_devedition",
            VersionType::Beta => "beta",
            VersionType::ReleaseCandidate => "release_candidate",
            VersionType::Release => "release",
            VersionType::Esr => "esr",
        }
    }
}

impl std::str::FromStr for VersionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nightly" => Ok(VersionType::Nightly),
            "aurora_or_devedition" => Ok(VersionType::AuroraOrDevedition),
            "beta" => Ok(VersionType::Beta),
            "release_candidate" => Ok(VersionType::ReleaseCandidate),
            "release" => Ok(VersionType::Release),
            "esr" => Ok(VersionType::Esr),
            _ => Err(()),
        }
    }
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for VersionType {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == 0
    }
}

impl Eq for VersionType {}

impl PartialOrd for VersionType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl Hash for VersionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
    }
}
