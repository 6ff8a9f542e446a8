//! Gecko version numbers (Firefox, Devedition, Fennec, Thunderbird, Snap packages)
//!
//! One engine validates, compares and bumps every Gecko-based product. What differs
//! between products (accepted grammar, shipped exceptions, extra rules, how the build
//! number is written) comes from a [`GeckoFlavor`].
//!
//! # Validation
//!
//! Parsing and constructing go through the same steps:
//!
//! 1. numbers counting from 1 (beta, build, release candidate, old fourth) must not be 0
//! 2. exactly one channel must be detected
//! 3. unless the version is one of the flavour's shipped edge cases, every rule below is
//!    evaluated and all violations are reported together
//!
//! ```text
//! old fourth number        only on 1.5.0.x and 2.0.0.x
//! beta + patch number      never
//! from Gecko 5             no release candidate, minor and patch not both 0,
//!                          patch required when minor > 0, no patch on nightly/aurora,
//!                          no aurora after 54
//! before Gecko 5           release candidates carry no patch or old fourth number
//! ```

pub mod flavors;

use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::config::{
    FIRST_RAPID_RELEASE_MAJOR, LAST_AURORA_MAJOR, OLD_FOURTH_NUMBER_LINES, next_channel,
    next_known_esr,
};
use crate::parser::{FieldMatch, find_version_type, strictly_positive};
use crate::version::error::{Error, Result};
use crate::version::numbers::{
    MANDATORY_FIELDS, NumberField, Numbers, bump_numbers, difference, optional_difference,
};
use crate::version::traits::{ReleaseChannel, Version};
use crate::version::version_type::VersionType;

pub use flavors::{
    Devedition, DeveditionVersion, Fennec, FennecVersion, Firefox, FirefoxVersion, Generic,
    GeckoSnap, GeckoSnapVersion, Thunderbird, ThunderbirdVersion,
};

pub(crate) static GECKO_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)",
        r"(\.(?P<patch_number>\d+))?",
        r"(\.(?P<old_fourth_number>\d+))?",
        r"((?P<is_nightly>a1)|(?P<is_aurora_or_devedition>a2)|rc(?P<release_candidate_number>\d+)|b(?P<beta_number>\d+)|(?P<is_esr>esr))?",
        r"(-?build(?P<build_number>\d+))?$",
    ))
    .unwrap()
});

/// Fields in bump order, most significant first
const GECKO_LAYOUT: &[NumberField] = &[
    NumberField::Major,
    NumberField::Minor,
    NumberField::Patch,
    NumberField::OldFourth,
    NumberField::ReleaseCandidate,
    NumberField::Beta,
    NumberField::Build,
];

/// How the build number is written after the version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStyle {
    /// `32.0build1`
    Keyword,
    /// `32.0-1`
    Dash,
}

/// Product-specific part of Gecko versioning
///
/// Every hook has a default matching plain Gecko, so a flavour only overrides what it
/// changes. Tests use custom flavours to inject broken grammars or channel detection.
pub trait GeckoFlavor: Copy + fmt::Debug + Default + Send + Sync + 'static {
    /// Product name, used in log events
    const NAME: &'static str;

    /// Shipped versions that break the rules, accepted as-is
    const EDGE_CASES: &'static [&'static str] = &[];

    const BUILD_STYLE: BuildStyle = BuildStyle::Keyword;

    fn grammar() -> &'static Regex {
        &GECKO_GRAMMAR
    }

    fn channel_candidates(parts: &GeckoParts) -> [(VersionType, bool); 6] {
        default_channel_candidates(parts)
    }

    /// Whether a version may omit its patch number despite a minor number above 0
    fn allows_missing_patch(_parts: &GeckoParts) -> bool {
        false
    }

    /// Appends the product-specific rules `parts` violates
    fn check(_parts: &GeckoParts, _version_type: VersionType, _violations: &mut Vec<String>) {}

    /// Last chance to fix up a bumped version before it gets validated
    fn adjust_bump(_original: &GeckoParts, _field: NumberField, _bumped: &mut GeckoParts) {}

    /// Whether a release without patch number starts a major line even if its minor is not 0
    fn is_major_line(_parts: &GeckoParts) -> bool {
        false
    }
}

/// Channel conditions of a Gecko version, in detection order
pub fn default_channel_candidates(parts: &GeckoParts) -> [(VersionType, bool); 6] {
    let is_beta = parts.beta_number.is_some();
    let is_release_candidate = parts.release_candidate_number.is_some();
    let is_release = !(parts.is_nightly
        || parts.is_aurora_or_devedition
        || is_beta
        || is_release_candidate
        || parts.is_esr);

    [
        (VersionType::Nightly, parts.is_nightly),
        (VersionType::AuroraOrDevedition, parts.is_aurora_or_devedition),
        (VersionType::Beta, is_beta),
        (VersionType::ReleaseCandidate, is_release_candidate),
        (VersionType::Esr, parts.is_esr),
        (VersionType::Release, is_release),
    ]
}

/// Raw fields of a Gecko version, before validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GeckoParts {
    pub major_number: u64,
    pub minor_number: u64,
    pub patch_number: Option<u64>,
    pub old_fourth_number: Option<u64>,
    pub release_candidate_number: Option<u64>,
    pub beta_number: Option<u64>,
    pub build_number: Option<u64>,
    pub is_nightly: bool,
    pub is_aurora_or_devedition: bool,
    pub is_esr: bool,
}

impl GeckoParts {
    pub fn new(major_number: u64, minor_number: u64) -> Self {
        Self {
            major_number,
            minor_number,
            ..Default::default()
        }
    }

    fn from_fields(fields: &FieldMatch<'_>) -> Result<Self> {
        Ok(Self {
            major_number: fields.mandatory_number(NumberField::Major.as_str())?,
            minor_number: fields.mandatory_number(NumberField::Minor.as_str())?,
            patch_number: fields.number(NumberField::Patch.as_str())?,
            old_fourth_number: fields.number(NumberField::OldFourth.as_str())?,
            release_candidate_number: fields.number(NumberField::ReleaseCandidate.as_str())?,
            beta_number: fields.number(NumberField::Beta.as_str())?,
            build_number: fields.number(NumberField::Build.as_str())?,
            is_nightly: fields.flag("is_nightly"),
            is_aurora_or_devedition: fields.flag("is_aurora_or_devedition"),
            is_esr: fields.flag("is_esr"),
        })
    }

    fn numbers(&self) -> Numbers {
        Numbers::default()
            .with(NumberField::Major, Some(self.major_number))
            .with(NumberField::Minor, Some(self.minor_number))
            .with(NumberField::Patch, self.patch_number)
            .with(NumberField::OldFourth, self.old_fourth_number)
            .with(NumberField::ReleaseCandidate, self.release_candidate_number)
            .with(NumberField::Beta, self.beta_number)
            .with(NumberField::Build, self.build_number)
    }

    fn with_numbers(&self, numbers: &Numbers) -> Self {
        Self {
            major_number: numbers.get(NumberField::Major).unwrap_or(self.major_number),
            minor_number: numbers.get(NumberField::Minor).unwrap_or(self.minor_number),
            patch_number: numbers.get(NumberField::Patch),
            old_fourth_number: numbers.get(NumberField::OldFourth),
            release_candidate_number: numbers.get(NumberField::ReleaseCandidate),
            beta_number: numbers.get(NumberField::Beta),
            build_number: numbers.get(NumberField::Build),
            ..*self
        }
    }

    /// Canonical string, regenerated from the numbers
    pub fn render(&self, build_style: BuildStyle) -> String {
        let mut rendered = format!("{}.{}", self.major_number, self.minor_number);
        if let Some(patch) = self.patch_number {
            let _ = write!(rendered, ".{patch}");
        }
        if let Some(old_fourth) = self.old_fourth_number {
            let _ = write!(rendered, ".{old_fourth}");
        }
        if self.is_nightly {
            rendered.push_str("a1");
        }
        if self.is_aurora_or_devedition {
            rendered.push_str("a2");
        }
        if let Some(rc) = self.release_candidate_number {
            let _ = write!(rendered, "rc{rc}");
        }
        if let Some(beta) = self.beta_number {
            let _ = write!(rendered, "b{beta}");
        }
        if self.is_esr {
            rendered.push_str("esr");
        }
        if let Some(build) = self.build_number {
            let _ = match build_style {
                BuildStyle::Keyword => write!(rendered, "build{build}"),
                BuildStyle::Dash => write!(rendered, "-{build}"),
            };
        }
        rendered
    }

    fn is_rapid_release(&self) -> bool {
        self.major_number >= FIRST_RAPID_RELEASE_MAJOR
    }

    /// Rules shared by every Gecko product, in reporting order
    fn violations(&self, allows_missing_patch: bool) -> Vec<String> {
        let mut violations = Vec::new();

        if self.old_fourth_number.is_some()
            && !(OLD_FOURTH_NUMBER_LINES.contains(&(self.major_number, self.minor_number))
                && self.patch_number == Some(0))
        {
            violations
                .push("The old fourth number can only be defined on Gecko 1.5.x.y or 2.0.x.y".into());
        }

        if self.beta_number.is_some() && self.patch_number.is_some() {
            violations.push("Beta number and patch number cannot be both defined".into());
        }

        if self.is_rapid_release() {
            if self.release_candidate_number.is_some() {
                violations.push(format!(
                    "Release candidate number cannot be defined starting Gecko {FIRST_RAPID_RELEASE_MAJOR}"
                ));
            }
            if self.minor_number == 0 && self.patch_number == Some(0) {
                violations.push("Minor number and patch number cannot be both equal to 0".into());
            }
            if self.minor_number != 0 && self.patch_number.is_none() && !allows_missing_patch {
                violations.push(
                    "Patch number cannot be undefined if minor number is greater than 0".into(),
                );
            }
            if self.patch_number.is_some() && self.is_nightly {
                violations.push("Patch number cannot be defined on a nightly version".into());
            }
            if self.patch_number.is_some() && self.is_aurora_or_devedition {
                violations.push("Patch number cannot be defined on an aurora version".into());
            }
            if self.major_number > LAST_AURORA_MAJOR && self.is_aurora_or_devedition {
                violations.push(format!(
                    "Last aurora/devedition version was {LAST_AURORA_MAJOR}"
                ));
            }
        } else if self.release_candidate_number.is_some() {
            if self.patch_number.is_some() {
                violations
                    .push("Release candidate and patch number cannot be both defined".into());
            }
            if self.old_fourth_number.is_some() {
                violations.push(
                    "Release candidate and old fourth number cannot be both defined".into(),
                );
            }
        }

        violations
    }
}

/// A validated Gecko version, for the product described by `F`
#[derive(Debug, Clone, Copy)]
pub struct GeckoVersion<F: GeckoFlavor = Generic> {
    parts: GeckoParts,
    version_type: VersionType,
    flavor: PhantomData<F>,
}

impl<F: GeckoFlavor> GeckoVersion<F> {
    /// Release `major.minor`
    pub fn new(major_number: u64, minor_number: u64) -> Result<Self> {
        Self::from_parts(GeckoParts::new(major_number, minor_number))
    }

    pub fn from_parts(parts: GeckoParts) -> Result<Self> {
        let rendered = parts.render(F::BUILD_STYLE);
        Self::validate(parts, &rendered)
    }

    pub fn parse(version: &str) -> Result<Self> {
        let grammar = F::grammar();
        let fields = FieldMatch::capture(grammar, version).ok_or_else(|| {
            debug!("{} version '{}' does not match the grammar", F::NAME, version);
            Error::pattern_not_matched(version, grammar.as_str())
        })?;
        Self::validate(GeckoParts::from_fields(&fields)?, version)
    }

    fn validate(parts: GeckoParts, version: &str) -> Result<Self> {
        strictly_positive(version, NumberField::Beta.as_str(), parts.beta_number)?;
        strictly_positive(version, NumberField::Build.as_str(), parts.build_number)?;
        strictly_positive(
            version,
            NumberField::ReleaseCandidate.as_str(),
            parts.release_candidate_number,
        )?;
        strictly_positive(version, NumberField::OldFourth.as_str(), parts.old_fourth_number)?;

        let version_type = find_version_type(version, &F::channel_candidates(&parts))?;

        let rendered = parts.render(F::BUILD_STYLE);
        if F::EDGE_CASES.contains(&rendered.as_str()) {
            debug!("{} {} is a shipped edge case, skipping checks", F::NAME, rendered);
        } else {
            let mut violations = parts.violations(F::allows_missing_patch(&parts));
            F::check(&parts, version_type, &mut violations);
            if let Some(error) = Error::violated_rules(version, violations) {
                return Err(error);
            }
        }

        Ok(Self {
            parts,
            version_type,
            flavor: PhantomData,
        })
    }

    pub fn parts(&self) -> &GeckoParts {
        &self.parts
    }

    pub fn old_fourth_number(&self) -> Option<u64> {
        self.parts.old_fourth_number
    }

    pub fn release_candidate_number(&self) -> Option<u64> {
        self.parts.release_candidate_number
    }

    pub fn beta_number(&self) -> Option<u64> {
        self.parts.beta_number
    }

    pub fn build_number(&self) -> Option<u64> {
        self.parts.build_number
    }

    /// First release of a major line (`60.0`, `60.0esr`, `3.6`)
    pub fn is_major(&self) -> bool {
        (self.is_release() || self.is_esr())
            && self.parts.patch_number.is_none()
            && self.parts.old_fourth_number.is_none()
            && (self.parts.minor_number == 0
                || !self.parts.is_rapid_release()
                || F::is_major_line(&self.parts))
    }

    /// Dot release shipping fixes on top of a major one (`60.0.1`, `60.1.0esr`)
    pub fn is_stability(&self) -> bool {
        (self.is_release() || self.is_esr()) && !self.is_major()
    }

    /// Moves the version to the next channel, e.g. `32.0b10build3` to `32.0build1`.
    ///
    /// The new channel starts at number 1, and so does the build number if there is one.
    /// Transitions come from [`crate::config::GECKO_CHANNEL_STEPS`].
    pub fn bump_version_type(&self) -> Result<Self> {
        let fail = |reason: String| Error::invalid_bump(self, "version_type", reason);

        let Some(next) = next_channel(self.version_type, self.parts.major_number) else {
            return Err(fail(format!(
                "no channel follows {} on Gecko {}",
                self.version_type, self.parts.major_number
            )));
        };

        let mut parts = GeckoParts {
            release_candidate_number: None,
            beta_number: None,
            build_number: self.parts.build_number.map(|_| 1),
            is_nightly: false,
            is_aurora_or_devedition: false,
            is_esr: false,
            ..self.parts
        };
        match next {
            VersionType::Nightly => parts.is_nightly = true,
            VersionType::AuroraOrDevedition => parts.is_aurora_or_devedition = true,
            VersionType::Beta => parts.beta_number = Some(1),
            VersionType::ReleaseCandidate => parts.release_candidate_number = Some(1),
            VersionType::Esr => parts.is_esr = true,
            VersionType::Release => {}
        }

        let bumped = Self::from_parts(parts).map_err(|e| fail(e.to_string()))?;
        debug!(
            "Moved {} {} from {} to {}: {}",
            F::NAME,
            self,
            self.version_type,
            next,
            bumped
        );
        Ok(bumped)
    }
}

impl<F: GeckoFlavor> Version for GeckoVersion<F> {
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
            optional_difference(this.old_fourth_number, that.old_fourth_number),
            i64::from(self.version_type.compare(other.version_type)),
            optional_difference(this.beta_number, that.beta_number),
            optional_difference(this.release_candidate_number, that.release_candidate_number),
        ];
        if let Some(diff) = ordered.into_iter().find(|&diff| diff != 0) {
            return diff;
        }

        // Builds only matter when both sides know theirs
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

        let numbers = bump_numbers(&original.numbers(), GECKO_LAYOUT, MANDATORY_FIELDS, field)
            .map_err(fail)?;
        let mut parts = original.with_numbers(&numbers);

        if field == NumberField::Major && self.is_esr() {
            parts.major_number = next_known_esr(original.major_number)
                .ok_or_else(|| fail("no known ESR follows this one"))?;
        }
        if field != NumberField::Build {
            parts.build_number = None;
        }
        if parts.beta_number == Some(0) {
            parts.beta_number = original.beta_number.map(|_| 1);
        }
        if parts.release_candidate_number == Some(0) {
            parts.release_candidate_number = original.release_candidate_number.map(|_| 1);
        }
        if field == NumberField::OldFourth && parts.patch_number.is_none() {
            parts.patch_number = Some(0);
        }
        if field != NumberField::OldFourth && parts.old_fourth_number == Some(0) {
            parts.old_fourth_number = None;
        }
        if field != NumberField::Patch
            && parts.patch_number == Some(0)
            && (parts.minor_number == 0 || original.old_fourth_number.is_some())
        {
            parts.patch_number = None;
        }
        F::adjust_bump(original, field, &mut parts);

        let bumped = Self::from_parts(parts).map_err(|e| fail(&e.to_string()))?;
        debug!("Bumped {} of {} {} to {}", field, F::NAME, self, bumped);
        Ok(bumped)
    }
}

impl<F: GeckoFlavor> ReleaseChannel for GeckoVersion<F> {
    fn version_type(&self) -> VersionType {
        self.version_type
    }
}

impl<F: GeckoFlavor> FromStr for GeckoVersion<F> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<F: GeckoFlavor> fmt::Display for GeckoVersion<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.render(F::BUILD_STYLE))
    }
}

/// `32.0`, `32.0build1` and `32.0build2` all compare equal to each other on
/// `==`, while the two builds differ. Equality is therefore not transitive and
/// Gecko versions only implement the partial traits.
impl<F: GeckoFlavor> PartialEq for GeckoVersion<F> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == 0
    }
}

impl<F: GeckoFlavor> PartialOrd for GeckoVersion<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other).cmp(&0))
    }
}

impl<F: GeckoFlavor> Serialize for GeckoVersion<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, F: GeckoFlavor> Deserialize<'de> for GeckoVersion<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
