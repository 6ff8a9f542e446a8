use thiserror::Error;

use crate::version::version_type::VersionType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The string does not fit the grammar, or breaks one or more rules once matched.
    #[error("{}", render_unmatched_patterns(.version, .patterns))]
    PatternNotMatched {
        version: String,
        patterns: Vec<String>,
    },

    #[error("Release \"{version}\" does not contain a valid {field}")]
    MissingField { version: String, field: String },

    #[error("Invalid {field} in \"{version}\": {reason}")]
    InvalidValue {
        version: String,
        field: String,
        reason: String,
    },

    #[error("Release \"{version}\" cannot match types \"{first}\" and \"{second}\"")]
    TooManyTypes {
        version: String,
        first: VersionType,
        second: VersionType,
    },

    #[error(
        "Version \"{0}\" matched the pattern of a valid version, but it is unable to find what type it is. This is likely a bug in mozilla-version"
    )]
    NoVersionType(String),

    #[error("Cannot bump {field} of \"{version}\": {reason}")]
    InvalidBump {
        version: String,
        field: String,
        reason: String,
    },

    #[error("Cannot compare \"{version}\" with \"{other}\": {reason}")]
    InvalidComparison {
        version: String,
        other: String,
        reason: String,
    },
}

impl Error {
    /// Single pattern failure, e.g. a grammar mismatch or an unknown product.
    pub fn pattern_not_matched(version: impl Into<String>, pattern: impl Into<String>) -> Self {
        Error::PatternNotMatched {
            version: version.into(),
            patterns: vec![pattern.into()],
        }
    }

    /// Every rule a matched string violates, in evaluation order.
    ///
    /// Returns `None` when no rule was violated.
    pub fn violated_rules(version: impl Into<String>, patterns: Vec<String>) -> Option<Self> {
        if patterns.is_empty() {
            return None;
        }
        Some(Error::PatternNotMatched {
            version: version.into(),
            patterns,
        })
    }

    pub(crate) fn invalid_bump(
        version: impl ToString,
        field: impl ToString,
        reason: impl ToString,
    ) -> Self {
        Error::InvalidBump {
            version: version.to_string(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn render_unmatched_patterns(version: &str, patterns: &[String]) -> String {
    match patterns {
        [pattern] => format!("\"{version}\" does not match the pattern: {pattern}"),
        _ => {
            let mut message = format!("\"{version}\" does not match the patterns:");
            for pattern in patterns {
                message.push_str("\n - ");
                message.push_str(pattern);
            }
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        vec!["one single pattern"],
        "\"some string\" does not match the pattern: one single pattern"
    )]
    #[case(
        vec!["one pattern", "two patterns"],
        "\"some string\" does not match the patterns:\n - one pattern\n - two patterns"
    )]
    fn pattern_not_matched_message_depends_on_pattern_count(
        #[case] patterns: Vec<&str>,
        #[case] expected: &str,
    ) {
        let error = Error::violated_rules(
            "some string",
            patterns.into_iter().map(String::from).collect(),
        )
        .unwrap();

        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn violated_rules_without_any_rule_is_not_an_error() {
        assert_eq!(Error::violated_rules("32.0", vec![]), None);
    }

    #[test]
    fn too_many_types_names_both_channels() {
        let error = Error::TooManyTypes {
            version: "32.0a1a2".to_string(),
            first: VersionType::Nightly,
            second: VersionType::AuroraOrDevedition,
        };

        assert_eq!(
            error.to_string(),
            "Release \"32.0a1a2\" cannot match types \"nightly\" and \"aurora_or_devedition\""
        );
    }

    #[test]
    fn missing_field_message() {
        let error = Error::MissingField {
            version: "firefox".to_string(),
            field: "build_number".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Release \"firefox\" does not contain a valid build_number"
        );
    }
}
