//! Plain `major.minor[.patch]` versions

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parser::FieldMatch;
use crate::version::error::{Error, Result};
use crate::version::numbers::{
    MANDATORY_FIELDS, NumberField, Numbers, bump_numbers, difference, optional_difference,
};
use crate::version::traits::Version;

static BASE_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)(\.(?P<patch_number>\d+))?$")
        .unwrap()
});

pub(crate) const BASE_LAYOUT: &[NumberField] =
    &[NumberField::Major, NumberField::Minor, NumberField::Patch];

/// `major.minor[.patch]`
///
/// An undefined patch number compares as 0 but is kept when rendering, so
/// `32.0 == 32.0.0` while both render as given.
#[derive(Debug, Clone, Copy)]
pub struct BaseVersion {
    major_number: u64,
    minor_number: u64,
    patch_number: Option<u64>,
}

impl BaseVersion {
    pub fn new(major_number: u64, minor_number: u64, patch_number: Option<u64>) -> Self {
        Self {
            major_number,
            minor_number,
            patch_number,
        }
    }

    pub fn parse(version: &str) -> Result<Self> {
        let fields = FieldMatch::capture(&BASE_GRAMMAR, version)
            .ok_or_else(|| Error::pattern_not_matched(version, BASE_GRAMMAR.as_str()))?;
        Self::from_fields(&fields)
    }

    pub(crate) fn from_fields(fields: &FieldMatch<'_>) -> Result<Self> {
        Ok(Self {
            major_number: fields.mandatory_number(NumberField::Major.as_str())?,
            minor_number: fields.mandatory_number(NumberField::Minor.as_str())?,
            patch_number: fields.number(NumberField::Patch.as_str())?,
        })
    }

    pub(crate) fn numbers(&self) -> Numbers {
        Numbers::default()
            .with(NumberField::Major, Some(self.major_number))
            .with(NumberField::Minor, Some(self.minor_number))
            .with(NumberField::Patch, self.patch_number)
    }

    pub(crate) fn from_numbers(numbers: &Numbers) -> Self {
        Self {
            major_number: numbers.get(NumberField::Major).unwrap_or(0),
            minor_number: numbers.get(NumberField::Minor).unwrap_or(0),
            patch_number: numbers.get(NumberField::Patch),
        }
    }
}

impl Version for BaseVersion {
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
        ]
        .into_iter()
        .find(|&diff| diff != 0)
        .unwrap_or(0)
    }

    fn bump(&self, field: NumberField) -> Result<Self> {
        let bumped = bump_numbers(&self.numbers(), BASE_LAYOUT, MANDATORY_FIELDS, field)
            .map_err(|reason| Error::invalid_bump(self, field, reason))?;
        let bumped = Self::from_numbers(&bumped);
        debug!("Bumped {} of {} to {}", field, self, bumped);
        Ok(bumped)
    }
}

impl FromStr for BaseVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major_number, self.minor_number)?;
        if let Some(patch) = self.patch_number {
            write!(f, ".{patch}")?;
        }
        Ok(())
    }
}

impl PartialEq for BaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == 0
    }
}

impl Eq for BaseVersion {}

impl PartialOrd for BaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other).cmp(&0)
    }
}

impl Hash for BaseVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major_number.hash(state);
        self.minor_number.hash(state);
        self.patch_number.unwrap_or(0).hash(state);
    }
}

crate::version::impl_string_serde!(BaseVersion);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("32.0", 32, 0, None)]
    #[case("32.1", 32, 1, None)]
    #[case("32.0.1", 32, 0, Some(1))]
    #[case("032.00.01", 32, 0, Some(1))]
    fn parse_extracts_numbers(
        #[case] input: &str,
        #[case] major: u64,
        #[case] minor: u64,
        #[case] patch: Option<u64>,
    ) {
        let version = BaseVersion::parse(input).unwrap();

        assert_eq!(version.major_number(), major);
        assert_eq!(version.minor_number(), minor);
        assert_eq!(version.patch_number(), patch);
    }

    #[rstest]
    #[case("32")]
    #[case(".1")]
    #[case("32.")]
    #[case("32.0.1.2")]
    #[case("32.0b1")]
    #[case("-1.0")]
    #[case("")]
    fn parse_rejects_malformed_versions(#[case] input: &str) {
        assert!(matches!(
            BaseVersion::parse(input),
            Err(Error::PatternNotMatched { .. })
        ));
    }

    #[test]
    fn parse_reports_overflowing_numbers_as_invalid_values() {
        assert!(matches!(
            BaseVersion::parse("99999999999999999999999.0"),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[rstest]
    #[case("032.0", "32.0")]
    #[case("32.00", "32.0")]
    #[case("32.0.01", "32.0.1")]
    fn display_normalizes_leading_zeros(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(BaseVersion::parse(input).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("032.0")]
    #[case("32.00")]
    #[case("32.0.0")]
    fn equivalent_versions_are_equal(#[case] input: &str) {
        assert_eq!(BaseVersion::parse("32.0").unwrap(), BaseVersion::parse(input).unwrap());
    }

    #[rstest]
    #[case("32.0", "33.0", -1)]
    #[case("32.0", "32.2", -2)]
    #[case("32.0.3", "32.0", 3)]
    #[case("32.1", "32.0.5", 1)]
    #[case("32.0", "32.0", 0)]
    fn compare_returns_first_difference(
        #[case] version: &str,
        #[case] other: &str,
        #[case] expected: i64,
    ) {
        let version = BaseVersion::parse(version).unwrap();
        let other = BaseVersion::parse(other).unwrap();

        assert_eq!(version.compare(&other), expected);
    }

    #[rstest]
    #[case("32.0", "32.0.1", NumberField::Patch, -1)]
    #[case("32.0.4", "32.0.1", NumberField::Patch, 3)]
    #[case("33.0", "32.0", NumberField::Major, 1)]
    #[case("32.0", "32.0", NumberField::Beta, 0)]
    fn subtract_other_number_defaults_missing_numbers_to_zero(
        #[case] version: &str,
        #[case] other: &str,
        #[case] field: NumberField,
        #[case] expected: i64,
    ) {
        let version = BaseVersion::parse(version).unwrap();
        let other = BaseVersion::parse(other).unwrap();

        assert_eq!(
            version.subtract_other_number_from_this_number(&other, field),
            expected
        );
    }

    #[rstest]
    #[case("0.9", "major_number", "1.0")]
    #[case("0.9.1", "major_number", "1.0.0")]
    #[case("32.0", "minor_number", "32.1.0")]
    #[case("32.0.1", "minor_number", "32.1.0")]
    #[case("32.1", "minor_number", "32.2")]
    #[case("32.0", "patch_number", "32.0.1")]
    #[case("32.0.1", "patch_number", "32.0.2")]
    fn bump_field_increments_and_resets(
        #[case] input: &str,
        #[case] field: &str,
        #[case] expected: &str,
    ) {
        let version = BaseVersion::parse(input).unwrap();

        assert_eq!(version.bump_field(field).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("beta_number")]
    #[case("build_number")]
    #[case("unknown_field")]
    fn bump_field_rejects_fields_this_version_does_not_have(#[case] field: &str) {
        let version = BaseVersion::parse("32.0").unwrap();

        assert!(matches!(
            version.bump_field(field),
            Err(Error::InvalidBump { .. })
        ));
    }

    #[test]
    fn compare_str_parses_the_other_side() {
        let version = BaseVersion::parse("32.0").unwrap();

        assert_eq!(version.compare_str("032.0"), Ok(0));
        assert!(matches!(
            version.compare_str("not a version"),
            Err(Error::InvalidComparison { .. })
        ));
    }
}
