//! Gecko-based products

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{FIRST_DEVEDITION_BETA, LAST_FENNEC_MAJOR};
use crate::version::gecko::{BuildStyle, GeckoFlavor, GeckoParts, GeckoVersion};
use crate::version::numbers::NumberField;
use crate::version::version_type::VersionType;

static SNAP_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<major_number>\d+)\.(?P<minor_number>\d+)",
        r"(\.(?P<patch_number>\d+))?",
        r"(b(?P<beta_number>\d+)|(?P<is_esr>esr))?",
        r"-(?P<build_number>\d+)$",
    ))
    .unwrap()
});

/// Any Gecko product, without product-specific exceptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generic;

impl GeckoFlavor for Generic {
    const NAME: &'static str = "gecko";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Firefox;

impl GeckoFlavor for Firefox {
    const NAME: &'static str = "firefox";

    const EDGE_CASES: &'static [&'static str] = &[
        "1.5.0.1rc1",
        "33.1",
        "33.1build1",
        "33.1build2",
        "33.1build3",
        "38.0.5b1",
        "38.0.5b1build1",
        "38.0.5b1build2",
        "38.0.5b2",
        "38.0.5b2build1",
        "38.0.5b3",
        "38.0.5b3build1",
    ];
}

/// Developer Edition, shipped as a separate product from 54.0b11 on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Devedition;

impl GeckoFlavor for Devedition {
    const NAME: &'static str = "devedition";

    fn check(parts: &GeckoParts, version_type: VersionType, violations: &mut Vec<String>) {
        let (first_major, first_beta) = FIRST_DEVEDITION_BETA;
        let is_shipped_beta = version_type.is_same_variant(VersionType::Beta)
            && (parts.major_number, parts.beta_number.unwrap_or(0)) >= (first_major, first_beta);
        if !is_shipped_beta {
            violations.push(format!(
                "Devedition as a product must be a beta >= {first_major}.0b{first_beta}"
            ));
        }
    }
}

/// Firefox for Android before Fenix
///
/// The 68 line kept shipping `68.X`, `68.Xa1` and `68.XbN` without patch number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fennec;

impl GeckoFlavor for Fennec {
    const NAME: &'static str = "fennec";

    const EDGE_CASES: &'static [&'static str] = &[
        "33.1",
        "33.1build1",
        "33.1build2",
        "38.0.5b4",
        "38.0.5b4build1",
    ];

    fn allows_missing_patch(parts: &GeckoParts) -> bool {
        parts.major_number == LAST_FENNEC_MAJOR && parts.minor_number > 0
    }

    fn check(parts: &GeckoParts, _version_type: VersionType, violations: &mut Vec<String>) {
        if parts.major_number > LAST_FENNEC_MAJOR {
            violations.push(format!("Last Fennec version is {LAST_FENNEC_MAJOR}"));
        }
    }

    fn adjust_bump(original: &GeckoParts, field: NumberField, bumped: &mut GeckoParts) {
        let is_pre_release = original.is_nightly || original.beta_number.is_some();
        if field == NumberField::Minor && original.major_number == LAST_FENNEC_MAJOR && is_pre_release
        {
            bumped.patch_number = None;
        }
    }

    fn is_major_line(parts: &GeckoParts) -> bool {
        parts.major_number == LAST_FENNEC_MAJOR
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thunderbird;

impl GeckoFlavor for Thunderbird {
    const NAME: &'static str = "thunderbird";

    const EDGE_CASES: &'static [&'static str] = &[
        "45.1b1",
        "45.1b1build1",
        "45.2",
        "45.2build1",
        "45.2build2",
        "45.2b1",
        "45.2b1build2",
    ];
}

/// Snap packages: `63.0b7-1`, the build number following a dash
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeckoSnap;

impl GeckoFlavor for GeckoSnap {
    const NAME: &'static str = "gecko-snap";

    const BUILD_STYLE: BuildStyle = BuildStyle::Dash;

    fn grammar() -> &'static Regex {
        &SNAP_GRAMMAR
    }

    fn check(parts: &GeckoParts, _version_type: VersionType, violations: &mut Vec<String>) {
        if parts.build_number.is_none() {
            violations.push("Build number must be defined on a snap version".into());
        }
    }
}

pub type FirefoxVersion = GeckoVersion<Firefox>;
pub type DeveditionVersion = GeckoVersion<Devedition>;
pub type FennecVersion = GeckoVersion<Fennec>;
pub type ThunderbirdVersion = GeckoVersion<Thunderbird>;
pub type GeckoSnapVersion = GeckoVersion<GeckoSnap>;
