//! Firefox for iOS versions: `139.0`, `139.0.1`, `139.0b2`
//!
//! The beta number is its own field and may be 0 (`139.0b0`). A beta never carries a
//! patch number.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parser::{FieldMatch, find_version_type};
use crate::version::error::{Error, Result};
use crate::version::numbers::{
    MANDATORY_FIELDS, NumberField, Numbers, bump_numbers, difference, optional_difference,
};
use crate::version::traits::{ReleaseChannel, Version};
use crate::version::version_type::VersionType;

static IOS_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)",
        r"(\.(?P<patch_number>\d+))?",
        r"(b(?P<beta_number>\d+))?$",
    ))
    .unwrap()
});

const IOS_LAYOUT: &[NumberField] = &[
    NumberField::Major,
    NumberField::Minor,
    NumberField::Patch,
    NumberField::Beta,
];

#[derive(Debug, Clone, Copy)]
pub struct MobileIosVersion {
    major_number: u64,
    minor_number: u64,
    patch_number: Option<u64>,
    beta_number: Option<u64>,
    version_type: VersionType,
}

impl MobileIosVersion {
    pub fn new(
        major_number: u64,
        minor_number: u64,
        patch_number: Option<u64>,
        beta_number: Option<u64>,
    ) -> Result<Self> {
        let numbers = Numbers::default()
            .with(NumberField::Major, Some(major_number))
            .with(NumberField::Minor, Some(minor_number))
            .with(NumberField::Patch, patch_number)
            .with(NumberField::Beta, beta_number);
        Self::from_numbers(&numbers, None)
    }

    pub fn parse(version: &str) -> Result<Self> {
        let fields = FieldMatch::capture(&IOS_GRAMMAR, version).ok_or_else(|| {
            debug!("iOS version '{}' does not match the grammar", version);
            Error::pattern_not_matched(version, IOS_GRAMMAR.as_str())
        })?;
        let numbers = Numbers::default()
            .with(
                NumberField::Major,
                Some(fields.mandatory_number(NumberField::Major.as_str())?),
            )
            .with(
                NumberField::Minor,
                Some(fields.mandatory_number(NumberField::Minor.as_str())?),
            )
            .with(NumberField::Patch, fields.number(NumberField::Patch.as_str())?)
            .with(NumberField::Beta, fields.number(NumberField::Beta.as_str())?);
        Self::from_numbers(&numbers, Some(version))
    }

    /// Validates `numbers`, reporting errors against `version` or the rendered numbers
    fn from_numbers(numbers: &Numbers, version: Option<&str>) -> Result<Self> {
        let candidate = Self {
            major_number: numbers.get(NumberField::Major).unwrap_or(0),
            minor_number: numbers.get(NumberField::Minor).unwrap_or(0),
            patch_number: numbers.get(NumberField::Patch),
            beta_number: numbers.get(NumberField::Beta),
            version_type: VersionType::Release,
        };
        let rendered = candidate.to_string();
        let version = version.unwrap_or(&rendered);

        let is_beta = candidate.beta_number.is_some();
        let version_type = find_version_type(
            version,
            &[(VersionType::Beta, is_beta), (VersionType::Release, !is_beta)],
        )?;

        let mut violations = Vec::new();
        if candidate.beta_number.is_some() && candidate.patch_number.is_some() {
            violations.push("Beta number and patch number cannot be both defined".to_string());
        }
        if candidate.minor_number == 0 && candidate.patch_number == Some(0) {
            violations.push("Minor number and patch number cannot be both equal to 0".to_string());
        }
        if let Some(error) = Error::violated_rules(version, violations) {
            return Err(error);
        }

        Ok(Self {
            version_type,
            ..candidate
        })
    }

    pub fn beta_number(&self) -> Option<u64> {
        self.beta_number
    }

    fn numbers(&self) -> Numbers {
        Numbers::default()
            .with(NumberField::Major, Some(self.major_number))
            .with(NumberField::Minor, Some(self.minor_number))
            .with(NumberField::Patch, self.patch_number)
            .with(NumberField::Beta, self.beta_number)
    }
}

impl Version for MobileIosVersion {
    fn major_number(&self) -> u64 {
        self.major_number
    }

    fn minor_number(&self) -> u64 {
        self.minor_number
    }

    fn patch_number(&self) -> Option<u64> {
        self.patch_number
    }

    fn number(&self, field: NumberField) -> Option<u64> {
        self.numbers().get(field)
    }

    fn compare(&self, other: &Self) -> i64 {
        [
            difference(self.major_number, other.major_number),
            difference(self.minor_number, other.minor_number),
            optional_difference(self.patch_number, other.patch_number),
            i64::from(self.version_type.compare(other.version_type)),
            optional_difference(self.beta_number, other.beta_number),
        ]
        .into_iter()
        .find(|&diff| diff != 0)
        .unwrap_or(0)
    }

    fn bump(&self, field: NumberField) -> Result<Self> {
        let fail = |reason: &str| Error::invalid_bump(self, field, reason);

        let mut numbers = bump_numbers(&self.numbers(), IOS_LAYOUT, MANDATORY_FIELDS, field)
            .map_err(fail)?;

        if numbers.get(NumberField::Patch) == Some(0) {
            numbers.set(NumberField::Patch, None);
        }
        // A dot release ends the beta. Otherwise betas restart at b0.
        if field == NumberField::Patch || self.beta_number.is_none() {
            numbers.set(NumberField::Beta, None);
        }

        let bumped = Self::from_numbers(&numbers, None).map_err(|e| fail(&e.to_string()))?;
        debug!("Bumped {} of iOS {} to {}", field, self, bumped);
        Ok(bumped)
    }
}

impl ReleaseChannel for MobileIosVersion {
    fn version_type(&self) -> VersionType {
        self.version_type
    }
}

impl FromStr for MobileIosVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MobileIosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major_number, self.minor_number)?;
        if let Some(patch) = self.patch_number {
            write!(f, ".{patch}")?;
        }
        if let Some(beta) = self.beta_number {
            write!(f, "b{beta}")?;
        }
        Ok(())
    }
}

impl PartialEq for MobileIosVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == 0
    }
}

impl Eq for MobileIosVersion {}

impl PartialOrd for MobileIosVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MobileIosVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other).cmp(&0)
    }
}

impl Hash for MobileIosVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major_number.hash(state);
        self.minor_number.hash(state);
        self.patch_number.unwrap_or(0).hash(state);
        self.version_type.hash(state);
        self.beta_number.unwrap_or(0).hash(state);
    }
}

crate::version::impl_string_serde!(MobileIosVersion);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ios(version: &str) -> MobileIosVersion {
        MobileIosVersion::parse(version).unwrap()
    }

    #[rstest]
    #[case("0.9", NumberField::Major, "1.0")]
    #[case("1.0", NumberField::Patch, "1.0.1")]
    #[case("1.5", NumberField::Minor, "1.6")]
    #[case("2.1", NumberField::Major, "3.0")]
    #[case("2.0", NumberField::Minor, "2.1")]
    #[case("2.0", NumberField::Patch, "2.0.1")]
    #[case("2.0.1", NumberField::Patch, "2.0.2")]
    #[case("2.0.1", NumberField::Minor, "2.1")]
    #[case("2.1", NumberField::Patch, "2.1.1")]
    #[case("2.0b0", NumberField::Beta, "2.0b1")]
    #[case("2.0b1", NumberField::Beta, "2.0b2")]
    #[case("2.0b1", NumberField::Patch, "2.0.1")]
    #[case("2.0b3", NumberField::Major, "3.0b0")]
    fn bump_never_leaves_a_zero_patch(
        #[case] input: &str,
        #[case] field: NumberField,
        #[case] expected: &str,
    ) {
        assert_eq!(ios(input).bump(field).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case(NumberField::Build)]
    #[case(NumberField::ReleaseCandidate)]
    fn bump_rejects_fields_ios_does_not_have(#[case] field: NumberField) {
        assert!(matches!(
            ios("2.0").bump(field),
            Err(Error::InvalidBump { .. })
        ));
    }

    #[rstest]
    #[case("0.0b1", true)]
    #[case("0.1b1", true)]
    #[case("0.1", false)]
    #[case("1.1b1", true)]
    #[case("42.0b0", true)]
    #[case("42.0", false)]
    fn beta_suffix_makes_a_beta(#[case] input: &str, #[case] expected: bool) {
        let version = ios(input);

        assert_eq!(version.is_beta(), expected);
        assert_eq!(version.is_release(), !expected);
    }

    #[rstest]
    #[case("139.0", "139.0", 0)]
    #[case("139.0.1", "139.0", 1)]
    #[case("139.0.2", "139.0.1", 1)]
    #[case("139.0", "139.0.1", -1)]
    #[case("139.0b1", "139.0.1", -1)]
    #[case("139.1", "139.0", 1)]
    #[case("139.1", "140.0", -1)]
    #[case("139.0b0", "139.0b0", 0)]
    #[case("139.0b1", "139.0b0", 1)]
    #[case("139.0b0", "139.0b1", -1)]
    #[case("139.0b1", "139.1", -1)]
    #[case("139.2", "139.0b1", 2)]
    #[case("139.0b5", "139.0", -2)]
    fn compare_returns_first_difference(
        #[case] version: &str,
        #[case] other: &str,
        #[case] expected: i64,
    ) {
        assert_eq!(ios(version).compare(&ios(other)), expected);
    }

    #[rstest]
    #[case("139.0.0")]
    #[case("139.0.1b1")]
    #[case("139.0.0b1")]
    #[case("139")]
    #[case("139.0a1")]
    #[case("139.0-beta.1")]
    fn parse_rejects_invalid_versions(#[case] input: &str) {
        assert!(matches!(
            MobileIosVersion::parse(input),
            Err(Error::PatternNotMatched { .. })
        ));
    }

    #[test]
    fn parse_reports_every_violated_rule() {
        let Err(Error::PatternNotMatched { patterns, .. }) = MobileIosVersion::parse("139.0.0b1")
        else {
            panic!("139.0.0b1 should not be valid");
        };

        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn new_validates_like_parse() {
        assert_eq!(
            MobileIosVersion::new(139, 0, None, Some(2)).unwrap(),
            ios("139.0b2")
        );
        assert!(MobileIosVersion::new(139, 0, Some(0), None).is_err());
    }

    #[test]
    fn equal_versions_hash_alike() {
        use std::collections::HashSet;

        let set: HashSet<_> = ["139.0", "139.00", "0139.0"].into_iter().map(ios).collect();

        assert_eq!(set.len(), 1);
    }
}
