use std::ops::RangeInclusive;

use crate::version::version_type::VersionType;

// =============================================================================
// Gecko eras
// =============================================================================

/// First major number of the rapid release cycle (Gecko 5, 2011)
pub const FIRST_RAPID_RELEASE_MAJOR: u64 = 5;

/// Last major number that shipped an aurora (a2) build
pub const LAST_AURORA_MAJOR: u64 = 54;

/// Product lines that used a fourth version number (1.5.0.x and 2.0.0.x)
pub const OLD_FOURTH_NUMBER_LINES: &[(u64, u64)] = &[(1, 5), (2, 0)];

/// Major numbers that started an Extended Support Release
pub const KNOWN_ESR_MAJOR_NUMBERS: &[u64] = &[
    10, 17, 24, 31, 38, 45, 52, 60, 68, 78, 91, 102, 115, 128, 140,
];

/// Last major number shipped by Fennec
pub const LAST_FENNEC_MAJOR: u64 = 68;

/// First Developer Edition build shipped as a beta (54.0b11)
pub const FIRST_DEVEDITION_BETA: (u64, u64) = (54, 11);

// =============================================================================
// Mobile eras
// =============================================================================

/// First mobile major number using the Gecko-like format (`104.0b1` instead of `103.0.0-beta.1`)
pub const MOBILE_FIRST_GECKO_STYLE_MAJOR: u64 = 104;

/// Mobile versions shipped despite breaking the usual rules
pub const MOBILE_EDGE_CASES: &[&str] = &["104.0.0"];

// =============================================================================
// Channel transitions
// =============================================================================

/// One allowed channel promotion, valid for a range of major numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStep {
    pub from: VersionType,
    pub majors: RangeInclusive<u64>,
    pub to: VersionType,
}

/// How a Gecko version moves to its next channel.
///
/// Nightly fed aurora until 54; from 55 on it feeds beta directly. Betas went
/// through release candidates before the rapid release cycle.
pub const GECKO_CHANNEL_STEPS: &[ChannelStep] = &[
    ChannelStep {
        from: VersionType::Nightly,
        majors: 0..=LAST_AURORA_MAJOR,
        to: VersionType::AuroraOrDevedition,
    },
    ChannelStep {
        from: VersionType::Nightly,
        majors: LAST_AURORA_MAJOR + 1..=u64::MAX,
        to: VersionType::Beta,
    },
    ChannelStep {
        from: VersionType::AuroraOrDevedition,
        majors: 0..=u64::MAX,
        to: VersionType::Beta,
    },
    ChannelStep {
        from: VersionType::Beta,
        majors: 0..=FIRST_RAPID_RELEASE_MAJOR - 1,
        to: VersionType::ReleaseCandidate,
    },
    ChannelStep {
        from: VersionType::Beta,
        majors: FIRST_RAPID_RELEASE_MAJOR..=u64::MAX,
        to: VersionType::Release,
    },
    ChannelStep {
        from: VersionType::ReleaseCandidate,
        majors: 0..=u64::MAX,
        to: VersionType::Release,
    },
    ChannelStep {
        from: VersionType::Release,
        majors: 0..=u64::MAX,
        to: VersionType::Esr,
    },
];

/// Returns the channel following `from` for the given major number, if any.
///
/// Releases only move to ESR on a major number that started an ESR line.
pub fn next_channel(from: VersionType, major_number: u64) -> Option<VersionType> {
    GECKO_CHANNEL_STEPS
        .iter()
        .filter(|step| step.from.is_same_variant(from) && step.majors.contains(&major_number))
        .map(|step| step.to)
        .find(|to| !to.is_same_variant(VersionType::Esr) || is_known_esr(major_number))
}

pub fn is_known_esr(major_number: u64) -> bool {
    KNOWN_ESR_MAJOR_NUMBERS.contains(&major_number)
}

/// Returns the first known ESR major number strictly greater than `major_number`
pub fn next_known_esr(major_number: u64) -> Option<u64> {
    KNOWN_ESR_MAJOR_NUMBERS
        .iter()
        .copied()
        .find(|&esr| esr > major_number)
}
