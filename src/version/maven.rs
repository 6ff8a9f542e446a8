//! Android Components versions published to Maven: `32.0`, `32.0.1-SNAPSHOT`

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parser::FieldMatch;
use crate::version::base::{BASE_LAYOUT, BaseVersion};
use crate::version::error::{Error, Result};
use crate::version::numbers::{MANDATORY_FIELDS, NumberField, bump_numbers};
use crate::version::traits::Version;

static MAVEN_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)",
        r"(\.(?P<patch_number>\d+))?",
        r"(?P<is_snapshot>-SNAPSHOT)?$",
    ))
    .unwrap()
});

/// A base version, optionally flagged as a development snapshot.
///
/// A snapshot precedes the release it leads to: `32.0-SNAPSHOT < 32.0`.
#[derive(Debug, Clone, Copy)]
pub struct MavenVersion {
    base: BaseVersion,
    is_snapshot: bool,
}

impl MavenVersion {
    pub fn new(
        major_number: u64,
        minor_number: u64,
        patch_number: Option<u64>,
        is_snapshot: bool,
    ) -> Self {
        Self {
            base: BaseVersion::new(major_number, minor_number, patch_number),
            is_snapshot,
        }
    }

    pub fn parse(version: &str) -> Result<Self> {
        let fields = FieldMatch::capture(&MAVEN_GRAMMAR, version).ok_or_else(|| {
            debug!("Maven version '{}' does not match the grammar", version);
            Error::pattern_not_matched(version, MAVEN_GRAMMAR.as_str())
        })?;
        Ok(Self {
            base: BaseVersion::from_fields(&fields)?,
            is_snapshot: fields.flag("is_snapshot"),
        })
    }

    pub fn is_snapshot(&self) -> bool {
        self.is_snapshot
    }

    pub fn is_release(&self) -> bool {
        !self.is_snapshot
    }
}

impl Version for MavenVersion {
    fn major_number(&self) -> u64 {
        self.base.major_number()
    }

    fn minor_number(&self) -> u64 {
        self.base.minor_number()
    }

    fn patch_number(&self) -> Option<u64> {
        self.base.patch_number()
    }

    fn number(&self, field: NumberField) -> Option<u64> {
        self.base.number(field)
    }

    fn compare(&self, other: &Self) -> i64 {
        let diff = self.base.compare(&other.base);
        if diff != 0 {
            return diff;
        }
        match (self.is_snapshot, other.is_snapshot) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }

    fn bump(&self, field: NumberField) -> Result<Self> {
        let numbers = bump_numbers(&self.base.numbers(), BASE_LAYOUT, MANDATORY_FIELDS, field)
            .map_err(|reason| Error::invalid_bump(self, field, reason))?;
        let bumped = Self {
            base: BaseVersion::from_numbers(&numbers),
            is_snapshot: self.is_snapshot,
        };
        debug!("Bumped {} of maven {} to {}", field, self, bumped);
        Ok(bumped)
    }
}

impl FromStr for MavenVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        if self.is_snapshot {
            f.write_str("-SNAPSHOT")?;
        }
        Ok(())
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == 0
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other).cmp(&0)
    }
}

impl Hash for MavenVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        self.is_snapshot.hash(state);
    }
}

crate::version::impl_string_serde!(MavenVersion);
