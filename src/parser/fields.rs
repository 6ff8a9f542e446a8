//! Named fields extracted from a version string

use std::collections::HashMap;

use regex::Regex;

use crate::version::error::{Error, Result};

/// Captured text per field name.
///
/// Built from a regex match or directly from pairs, so the extraction logic does not
/// depend on how the string was matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMatch<'a> {
    input: &'a str,
    fields: HashMap<String, &'a str>,
}

impl<'a> FieldMatch<'a> {
    /// Matches `input` against `pattern` and keeps every named group that participated.
    ///
    /// Returns `None` if the pattern does not match.
    pub fn capture(pattern: &Regex, input: &'a str) -> Option<Self> {
        let captures = pattern.captures(input)?;
        let fields = pattern
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|value| (name.to_string(), value.as_str()))
            })
            .collect();

        Some(Self { input, fields })
    }

    pub fn from_pairs<I>(input: &'a str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self { input, fields }
    }

    /// The string the fields were extracted from
    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.fields.get(field).copied()
    }

    pub fn mandatory(&self, field: &str) -> Result<&'a str> {
        self.get(field).ok_or_else(|| Error::MissingField {
            version: self.input.to_string(),
            field: field.to_string(),
        })
    }

    /// Boolean fields are set when their group matched anything
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).is_some_and(|value| !value.is_empty())
    }

    pub fn number(&self, field: &str) -> Result<Option<u64>> {
        self.get(field)
            .map(|raw| positive_int(self.input, field, raw))
            .transpose()
    }

    pub fn mandatory_number(&self, field: &str) -> Result<u64> {
        positive_int(self.input, field, self.mandatory(field)?)
    }
}

/// Parses a non-negative integer. Signs other than `+`, decimals and words are rejected.
pub fn positive_int(version: &str, field: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|e| Error::InvalidValue {
        version: version.to_string(),
        field: field.to_string(),
        reason: format!("\"{raw}\" is not a positive integer: {e}"),
    })
}

/// Rejects zero on numbers that count from 1 (beta, build and release candidate numbers).
pub fn strictly_positive(version: &str, field: &str, value: Option<u64>) -> Result<Option<u64>> {
    match value {
        Some(0) => Err(Error::InvalidValue {
            version: version.to_string(),
            field: field.to_string(),
            reason: "must be strictly positive".to_string(),
        }),
        other => Ok(other),
    }
}
