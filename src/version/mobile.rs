//! Firefox for Android (Fenix) and Focus versions
//!
//! Mobile versions switched formats at 104. Before that they looked like semver
//! (`103.0.0-beta.1`, `103.0.0-rc.2`). From 104 on they follow Gecko (`104.0b1`,
//! `104.0a1`, `104.0build1`).

use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::config::{MOBILE_EDGE_CASES, MOBILE_FIRST_GECKO_STYLE_MAJOR};
use crate::parser::{FieldMatch, find_version_type, strictly_positive};
use crate::version::error::{Error, Result};
use crate::version::numbers::{
    MANDATORY_FIELDS, NumberField, Numbers, bump_numbers, difference, optional_difference,
};
use crate::version::traits::{ReleaseChannel, Version};
use crate::version::version_type::VersionType;

static LEGACY_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)\.(?P<patch_number>\d+)",
        r"(-beta\.(?P<beta_number>\d+)|-rc\.(?P<release_candidate_number>\d+))?$",
    ))
    .unwrap()
});

static GECKO_STYLE_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)",
        r"(\.(?P<patch_number>\d+))?",
        r"((?P<is_nightly>a1)|b(?P<beta_number>\d+))?",
        r"(-?build(?P<build_number>\d+))?$",
    ))
    .unwrap()
});

const MOBILE_LAYOUT: &[NumberField] = &[
    NumberField::Major,
    NumberField::Minor,
    NumberField::Patch,
    NumberField::Beta,
    NumberField::ReleaseCandidate,
    NumberField::Build,
];

/// Raw fields of a mobile version, before validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MobileParts {
    pub major_number: u64,
    pub minor_number: u64,
    pub patch_number: Option<u64>,
    pub beta_number: Option<u64>,
    pub release_candidate_number: Option<u64>,
    pub build_number: Option<u64>,
    pub is_nightly: bool,
}

impl MobileParts {
    pub fn new(major_number: u64, minor_number: u64, patch_number: Option<u64>) -> Self {
        Self {
            major_number,
            minor_number,
            patch_number,
            ..Default::default()
        }
    }

    fn from_fields(fields: &FieldMatch<'_>) -> Result<Self> {
        Ok(Self {
            major_number: fields.mandatory_number(NumberField::Major.as_str())?,
            minor_number: fields.mandatory_number(NumberField::Minor.as_str())?,
            patch_number: fields.number(NumberField::Patch.as_str())?,
            beta_number: fields.number(NumberField::Beta.as_str())?,
            release_candidate_number: fields.number(NumberField::ReleaseCandidate.as_str())?,
            build_number: fields.number(NumberField::Build.as_str())?,
            is_nightly: fields.flag("is_nightly"),
        })
    }

    fn numbers(&self) -> Numbers {
        Numbers::default()
            .with(NumberField::Major, Some(self.major_number))
            .with(NumberField::Minor, Some(self.minor_number))
            .with(NumberField::Patch, self.patch_number)
            .with(NumberField::Beta, self.beta_number)
            .with(NumberField::ReleaseCandidate, self.release_candidate_number)
            .with(NumberField::Build, self.build_number)
    }

    fn with_numbers(&self, numbers: &Numbers) -> Self {
        Self {
            major_number: numbers.get(NumberField::Major).unwrap_or(self.major_number),
            minor_number: numbers.get(NumberField::Minor).unwrap_or(self.minor_number),
            patch_number: numbers.get(NumberField::Patch),
            beta_number: numbers.get(NumberField::Beta),
            release_candidate_number: numbers.get(NumberField::ReleaseCandidate),
            build_number: numbers.get(NumberField::Build),
            ..*self
        }
    }

    fn is_gecko_style(&self) -> bool {
        self.major_number >= MOBILE_FIRST_GECKO_STYLE_MAJOR
    }

    /// Canonical string, in the format of the major number's era
    pub fn render(&self) -> String {
        let mut rendered = format!("{}.{}", self.major_number, self.minor_number);
        if let Some(patch) = self.patch_number {
            let _ = write!(rendered, ".{patch}");
        }

        if self.is_gecko_style() {
            if self.is_nightly {
                rendered.push_str("a1");
            }
            if let Some(beta) = self.beta_number {
                let _ = write!(rendered, "b{beta}");
            }
            if let Some(rc) = self.release_candidate_number {
                let _ = write!(rendered, "rc{rc}");
            }
            if let Some(build) = self.build_number {
                let _ = write!(rendered, "build{build}");
            }
        } else if let Some(beta) = self.beta_number {
            let _ = write!(rendered, "-beta.{beta}");
        } else if let Some(rc) = self.release_candidate_number {
            let _ = write!(rendered, "-rc.{rc}");
        }

        rendered
    }

    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.is_gecko_style() {
            if self.beta_number.is_some() && self.patch_number.is_some() {
                violations.push("Beta number and patch number cannot be both defined".into());
            }
            if self.release_candidate_number.is_some() {
                violations.push(format!(
                    "Release candidate number cannot be defined starting version {MOBILE_FIRST_GECKO_STYLE_MAJOR}"
                ));
            }
            if self.minor_number == 0 && self.patch_number == Some(0) {
                violations.push("Minor number and patch number cannot be both equal to 0".into());
            }
            if self.minor_number != 0 && self.patch_number.is_none() {
                violations.push(
                    "Patch number cannot be undefined if minor number is greater than 0".into(),
                );
            }
            if self.patch_number.is_some() && self.is_nightly {
                violations.push("Patch number cannot be defined on a nightly version".into());
            }
        } else {
            if self.patch_number.is_none() {
                violations.push(format!(
                    "Patch number must be defined before version {MOBILE_FIRST_GECKO_STYLE_MAJOR}"
                ));
            }
            if self.is_nightly {
                violations.push(format!(
                    "Nightly versions do not exist before version {MOBILE_FIRST_GECKO_STYLE_MAJOR}"
                ));
            }
            if self.build_number.is_some() {
                violations.push(format!(
                    "Build number cannot be defined before version {MOBILE_FIRST_GECKO_STYLE_MAJOR}"
                ));
            }
        }

        violations
    }
}

fn channel_candidates(parts: &MobileParts) -> [(VersionType, bool); 4] {
    let is_beta = parts.beta_number.is_some();
    let is_release_candidate = parts.release_candidate_number.is_some();
    let is_release = !(parts.is_nightly || is_beta || is_release_candidate);

    [
        (VersionType::Nightly, parts.is_nightly),
        (VersionType::Beta, is_beta),
        (VersionType::ReleaseCandidate, is_release_candidate),
        (VersionType::Release, is_release),
    ]
}

/// Grammar of the era `version` belongs to, picked from its leading major number
fn grammar_for(version: &str) -> &'static Regex {
    let major = version
        .split('.')
        .next()
        .and_then(|major| major.parse::<u64>().ok());
    match major {
        Some(major) if major >= MOBILE_FIRST_GECKO_STYLE_MAJOR => &GECKO_STYLE_GRAMMAR,
        _ => &LEGACY_GRAMMAR,
    }
}

/// A validated Fenix or Focus version
#[derive(Debug, Clone, Copy)]
pub struct MobileVersion {
    parts: MobileParts,
    version_type: VersionType,
}

/// Fenix versions are mobile versions
pub type FenixVersion = MobileVersion;

impl MobileVersion {
    pub fn new(major_number: u64, minor_number: u64, patch_number: Option<u64>) -> Result<Self> {
        Self::from_parts(MobileParts::new(major_number, minor_number, patch_number))
    }

    pub fn from_parts(parts: MobileParts) -> Result<Self> {
        let rendered = parts.render();
        Self::validate(parts, &rendered)
    }

    pub fn parse(version: &str) -> Result<Self> {
        Self::parse_with(grammar_for(version), version)
    }

    fn parse_with(grammar: &Regex, version: &str) -> Result<Self> {
        let fields = FieldMatch::capture(grammar, version).ok_or_else(|| {
            debug!("Mobile version '{}' does not match the grammar", version);
            Error::pattern_not_matched(version, grammar.as_str())
        })?;
        Self::validate(MobileParts::from_fields(&fields)?, version)
    }

    fn validate(parts: MobileParts, version: &str) -> Result<Self> {
        Self::validate_with(parts, version, &channel_candidates(&parts))
    }

    fn validate_with(
        parts: MobileParts,
        version: &str,
        candidates: &[(VersionType, bool)],
    ) -> Result<Self> {
        strictly_positive(version, NumberField::Beta.as_str(), parts.beta_number)?;
        strictly_positive(
            version,
            NumberField::ReleaseCandidate.as_str(),
            parts.release_candidate_number,
        )?;
        strictly_positive(version, NumberField::Build.as_str(), parts.build_number)?;

        let version_type = find_version_type(version, candidates)?;

        let rendered = parts.render();
        if MOBILE_EDGE_CASES.contains(&rendered.as_str()) {
            debug!("Mobile {} is a shipped edge case, skipping checks", rendered);
        } else if let Some(error) = Error::violated_rules(version, parts.violations()) {
            return Err(error);
        }

        Ok(Self {
            parts,
            version_type,
        })
    }

    pub fn parts(&self) -> &MobileParts {
        &self.parts
    }

    pub fn beta_number(&self) -> Option<u64> {
        self.parts.beta_number
    }

    pub fn release_candidate_number(&self) -> Option<u64> {
        self.parts.release_candidate_number
    }

    pub fn build_number(&self) -> Option<u64> {
        self.parts.build_number
    }
}

impl Version for MobileVersion {
    fn major_number(&self) -> u64 {
        self.parts.major_number
    }

    fn minor_number(&self) -> u64 {
        self.parts.minor_number
    }

    fn patch_number(&self) -> Option<u64> {
        self.parts.patch_number
    }

    fn number(&self, field: NumberField) -> Option<u64> {
        self.parts.numbers().get(field)
    }

    fn compare(&self, other: &Self) -> i64 {
        let (this, that) = (&self.parts, &other.parts);
        let ordered = [
            difference(this.major_number, that.major_number),
            difference(this.minor_number, that.minor_number),
            optional_difference(this.patch_number, that.patch_number),
            i64::from(self.version_type.compare(other.version_type)),
            optional_difference(this.beta_number, that.beta_number),
            optional_difference(this.release_candidate_number, that.release_candidate_number),
        ];
        if let Some(diff) = ordered.into_iter().find(|&diff| diff != 0) {
            return diff;
        }

        match (this.build_number, that.build_number) {
            (Some(build), Some(other_build)) => difference(build, other_build),
            _ => 0,
        }
    }

    fn bump(&self, field: NumberField) -> Result<Self> {
        let fail = |reason: &str| Error::invalid_bump(self, field, reason);
        let original = &self.parts;

        if field == NumberField::Build && original.build_number.is_none() {
            return Err(fail("build number is not defined"));
        }

        let numbers = bump_numbers(&original.numbers(), MOBILE_LAYOUT, MANDATORY_FIELDS, field)
            .map_err(fail)?;
        let mut parts = original.with_numbers(&numbers);

        if field != NumberField::Build {
            parts.build_number = None;
        }
        if parts.beta_number == Some(0) {
            parts.beta_number = original.beta_number.map(|_| 1);
        }
        if field != NumberField::ReleaseCandidate {
            parts.release_candidate_number = None;
        }
        // 103.0.0 becomes 104.0, not 104.0.0
        if parts.is_gecko_style() && parts.minor_number == 0 && parts.patch_number == Some(0) {
            parts.patch_number = None;
        }

        let bumped = Self::from_parts(parts).map_err(|e| fail(&e.to_string()))?;
        debug!("Bumped {} of mobile {} to {}", field, self, bumped);
        Ok(bumped)
    }
}

impl ReleaseChannel for MobileVersion {
    fn version_type(&self) -> VersionType {
        self.version_type
    }
}

impl FromStr for MobileVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MobileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.render())
    }
}

/// Builds only break ties when both sides have one, like Gecko versions.
impl PartialEq for MobileVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == 0
    }
}

impl PartialOrd for MobileVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other).cmp(&0))
    }
}

impl Serialize for MobileVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MobileVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mobile(version: &str) -> MobileVersion {
        MobileVersion::parse(version).unwrap()
    }

    #[rstest]
    #[case("0.3.0-rc.1", VersionType::ReleaseCandidate)]
    #[case("1.0.0", VersionType::Release)]
    #[case("1.0.1-rc.1", VersionType::ReleaseCandidate)]
    #[case("1.3.0-rc.3", VersionType::ReleaseCandidate)]
    #[case("3.0.0-beta.2", VersionType::Beta)]
    #[case("3.0.0", VersionType::Release)]
    #[case("104.0a1", VersionType::Nightly)]
    #[case("104.0b2", VersionType::Beta)]
    #[case("104.0", VersionType::Release)]
    #[case("104.0.0", VersionType::Release)]
    #[case("104.0.1", VersionType::Release)]
    #[case("109.0", VersionType::Release)]
    fn parse_detects_channel(#[case] input: &str, #[case] expected: VersionType) {
        let version = mobile(input);

        assert!(version.version_type().is_same_variant(expected));
    }

    #[rstest]
    #[case("1.0.0b1")]
    #[case("1.0.0.1b1")]
    #[case("1.0.0rc1")]
    #[case("1.5.1.1")]
    #[case("3.1.0b1")]
    #[case("31.0b2esr")]
    #[case("32")]
    #[case("32.b2")]
    #[case(".1")]
    #[case("32.0.1a1")]
    #[case("55.0a2")]
    #[case("104.0a2")]
    #[case("104.0.0-beta.1")]
    #[case("104.0-beta.1")]
    #[case("104.0.0-rc.1")]
    #[case("104.1")]
    #[case("109.0.0")]
    #[case("104.0.1a1")]
    #[case("104.0.1b1")]
    fn parse_rejects_invalid_versions(#[case] input: &str) {
        assert!(matches!(
            MobileVersion::parse(input),
            Err(Error::PatternNotMatched { .. })
        ));
    }

    #[rstest]
    #[case("3.0.0-beta.0")]
    #[case("3.0.0-rc.0")]
    #[case("104.0b0")]
    #[case("104.0build0")]
    fn parse_rejects_zero_counters(#[case] input: &str) {
        assert!(matches!(
            MobileVersion::parse(input),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[rstest]
    #[case(MobileParts::new(3, 0, Some(0)), "3.0.0")]
    #[case(MobileParts::new(3, 0, Some(1)), "3.0.1")]
    #[case(MobileParts { beta_number: Some(3), ..MobileParts::new(3, 0, Some(0)) }, "3.0.0-beta.3")]
    #[case(MobileParts { beta_number: Some(3), ..MobileParts::new(103, 0, Some(0)) }, "103.0.0-beta.3")]
    #[case(MobileParts { beta_number: Some(3), ..MobileParts::new(104, 0, None) }, "104.0b3")]
    #[case(MobileParts { release_candidate_number: Some(3), ..MobileParts::new(3, 0, Some(0)) }, "3.0.0-rc.3")]
    fn from_parts_renders_era_format(#[case] parts: MobileParts, #[case] expected: &str) {
        assert_eq!(MobileVersion::from_parts(parts).unwrap().to_string(), expected);
    }

    #[test]
    fn from_parts_reports_the_first_failing_check() {
        let both = MobileParts {
            beta_number: Some(1),
            release_candidate_number: Some(1),
            ..MobileParts::new(3, 0, Some(0))
        };
        let zero_beta = MobileParts {
            beta_number: Some(0),
            ..MobileParts::new(3, 0, Some(0))
        };

        assert!(matches!(
            MobileVersion::from_parts(both),
            Err(Error::TooManyTypes { .. })
        ));
        assert!(matches!(
            MobileVersion::from_parts(zero_beta),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            MobileVersion::new(3, 0, None),
            Err(Error::PatternNotMatched { .. })
        ));
    }

    #[test]
    fn legacy_versions_cannot_carry_gecko_style_fields() {
        let parts = MobileParts {
            build_number: Some(1),
            ..MobileParts::new(3, 0, Some(0))
        };

        let Err(Error::PatternNotMatched { patterns, .. }) = MobileVersion::from_parts(parts) else {
            panic!("build number accepted before 104");
        };
        assert_eq!(patterns, vec!["Build number cannot be defined before version 104"]);
    }

    #[rstest]
    #[case("2.0.0", "3.0.0")]
    #[case("2.0.0", "3.0.1")]
    #[case("2.0.1", "2.1.0")]
    #[case("2.1.0", "2.1.1")]
    #[case("2.0.0-beta.1", "3.0.0-beta.1")]
    #[case("2.0.0-beta.1", "2.0.0-beta.2")]
    #[case("2.0.0-beta.1", "2.0.0")]
    #[case("1.0.0-rc.1", "1.0.0-rc.2")]
    #[case("1.0.0-rc.1", "1.0.0")]
    #[case("3.5.0-beta.4", "3.5.0-rc.2")]
    #[case("3.5.0-rc.2", "3.5.0")]
    #[case("103.0.0", "104.0a1")]
    #[case("104.0a1", "104.0b1")]
    #[case("104.0b1", "104.0")]
    #[case("104.0build1", "104.0build2")]
    fn ordering_follows_numbers_then_channel(#[case] previous: &str, #[case] next: &str) {
        assert!(mobile(previous) < mobile(next));
        assert!(mobile(next) > mobile(previous));
        assert!(mobile(previous) != mobile(next));
    }

    #[rstest]
    #[case("3.0.0", "03.0.0")]
    #[case("3.0.0", "3.00.0")]
    #[case("3.0.0-beta.1", "03.0.0-beta.01")]
    #[case("3.0.0-rc.1", "3.0.0-rc.01")]
    #[case("104.0", "104.0.0")]
    #[case("104.0", "104.0build3")]
    fn equivalent_versions_are_equal(#[case] version: &str, #[case] other: &str) {
        assert_eq!(mobile(version), mobile(other));
        assert_eq!(mobile(version).compare_str(other), Ok(0));
    }

    #[rstest]
    #[case("02.0.0", "2.0.0")]
    #[case("2.0.0-rc.02", "2.0.0-rc.2")]
    #[case("2.0.0-beta.01", "2.0.0-beta.1")]
    #[case("0104.0", "104.0")]
    #[case("104.0build01", "104.0build1")]
    #[case("104.0-build1", "104.0build1")]
    #[case("104.0b01", "104.0b1")]
    #[case("104.0a1", "104.0a1")]
    fn display_renders_canonical_form(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(mobile(input).to_string(), expected);
    }

    #[rstest]
    #[case("0.9.0", NumberField::Major, "1.0.0")]
    #[case("0.9.1", NumberField::Major, "1.0.0")]
    #[case("1.0.0-beta.1", NumberField::Beta, "1.0.0-beta.2")]
    #[case("1.0.0-rc.1", NumberField::ReleaseCandidate, "1.0.0-rc.2")]
    #[case("1.0.0", NumberField::Patch, "1.0.1")]
    #[case("1.5.1", NumberField::Minor, "1.6.0")]
    #[case("2.0.0-rc.2", NumberField::Major, "3.0.0")]
    #[case("2.0.0-beta.1", NumberField::Major, "3.0.0-beta.1")]
    #[case("103.0.0-beta.1", NumberField::Major, "104.0b1")]
    #[case("103.0.0-rc.2", NumberField::Major, "104.0")]
    #[case("103.0.0", NumberField::Major, "104.0")]
    #[case("104.0a1", NumberField::Major, "105.0a1")]
    #[case("104.0b2", NumberField::Major, "105.0b1")]
    #[case("104.0", NumberField::Major, "105.0")]
    #[case("104.0", NumberField::Minor, "104.1.0")]
    #[case("104.0.1", NumberField::Minor, "104.1.0")]
    #[case("104.0", NumberField::Patch, "104.0.1")]
    #[case("104.0.1", NumberField::Patch, "104.0.2")]
    #[case("104.0b1", NumberField::Beta, "104.0b2")]
    #[case("104.0build1", NumberField::Build, "104.0build2")]
    #[case("104.0b1build1", NumberField::Build, "104.0b1build2")]
    fn bump_translates_across_formats(
        #[case] input: &str,
        #[case] field: NumberField,
        #[case] expected: &str,
    ) {
        let bumped = mobile(input).bump(field).unwrap();

        assert_eq!(bumped.to_string(), expected);
        assert!(bumped > mobile(input));
    }

    #[rstest]
    #[case("2.0.0-beta.1", NumberField::ReleaseCandidate)]
    #[case("2.0.0", NumberField::Build)]
    #[case("104.0", NumberField::OldFourth)]
    fn bump_rejects_impossible_results(#[case] input: &str, #[case] field: NumberField) {
        assert!(matches!(
            mobile(input).bump(field),
            Err(Error::InvalidBump { .. })
        ));
    }

    #[test]
    fn broken_grammar_is_caught_by_channel_detection() {
        let permissive = Regex::new(concat!(
            r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)(\.(?P<patch_number>\d+))?",
            r"(-beta\.(?P<beta_number>\d+))?(-rc\.(?P<release_candidate_number>\d+))?",
        ))
        .unwrap();

        assert!(matches!(
            MobileVersion::parse_with(&permissive, "2.0.0-beta.1-rc.2"),
            Err(Error::TooManyTypes { .. })
        ));
    }

    #[test]
    fn broken_channel_detection_is_reported() {
        let parts = MobileParts::new(2, 0, Some(0));

        assert!(matches!(
            MobileVersion::validate_with(parts, "2.0.0", &[(VersionType::Release, false)]),
            Err(Error::NoVersionType(_))
        ));
    }

    #[test]
    fn fenix_is_a_mobile_version() {
        let version: FenixVersion = "104.0b3".parse().unwrap();

        assert!(version.is_beta());
        assert!(version.is_development());
        assert_eq!(version.beta_number(), Some(3));
    }
}
