//! Numeric fields and the bump engine shared by every version scheme

use std::fmt;

/// A number a version can carry, and can be asked to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberField {
    Major,
    Minor,
    Patch,
    /// Fourth number of the 1.5.0.x and 2.0.0.x lines
    OldFourth,
    ReleaseCandidate,
    Beta,
    Build,
}

impl NumberField {
    pub const ALL: [NumberField; 7] = [
        NumberField::Major,
        NumberField::Minor,
        NumberField::Patch,
        NumberField::OldFourth,
        NumberField::ReleaseCandidate,
        NumberField::Beta,
        NumberField::Build,
    ];

    /// Returns the field name as used in version grammars
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberField::Major => "major_number",
            NumberField::Minor => "minor_number",
            NumberField::Patch => "patch_number",
            NumberField::OldFourth => "old_fourth_number",
            NumberField::ReleaseCandidate => "release_candidate_number",
            NumberField::Beta => "beta_number",
            NumberField::Build => "build_number",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl std::str::FromStr for NumberField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major_number" => Ok(NumberField::Major),
            "minor_number" => Ok(NumberField::Minor),
            "patch_number" => Ok(NumberField::Patch),
            "old_fourth_number" => Ok(NumberField::OldFourth),
            "release_candidate_number" => Ok(NumberField::ReleaseCandidate),
            "beta_number" => Ok(NumberField::Beta),
            "build_number" => Ok(NumberField::Build),
            _ => Err(()),
        }
    }
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every version defines
pub(crate) const MANDATORY_FIELDS: &[NumberField] = &[NumberField::Major, NumberField::Minor];

/// Values of every numeric field, indexed by [`NumberField`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Numbers([Option<u64>; 7]);

impl Numbers {
    pub(crate) fn get(&self, field: NumberField) -> Option<u64> {
        self.0[field.index()]
    }

    pub(crate) fn set(&mut self, field: NumberField, value: Option<u64>) {
        self.0[field.index()] = value;
    }

    pub(crate) fn with(mut self, field: NumberField, value: Option<u64>) -> Self {
        self.set(field, value);
        self
    }
}

/// Increments `field` and resets every field laid out after it.
///
/// `layout` lists the fields of a scheme from most to least significant. Fields before
/// `field` are kept. Fields after it are reset to 0, except optional fields that were
/// not defined: they stay undefined, unless the bump moved the minor number to 1, in
/// which case they are materialized as 0 (`32.0` bumps to `32.1.0`).
///
/// Fails with the reason of the refusal when `field` is not part of `layout` or is
/// already at `u64::MAX`.
pub(crate) fn bump_numbers(
    numbers: &Numbers,
    layout: &[NumberField],
    mandatory: &[NumberField],
    field: NumberField,
) -> std::result::Result<Numbers, &'static str> {
    if !layout.contains(&field) {
        return Err("field is not part of this version");
    }

    let mut bumped = *numbers;
    let mut reached = false;
    let mut fill_optional = false;

    for &current_field in layout {
        let current = numbers.get(current_field);

        if current_field == field {
            let next = match current {
                Some(n) => n.checked_add(1).ok_or("number overflow")?,
                None => 1,
            };
            bumped.set(current_field, Some(next));
            reached = true;
            fill_optional = next == 1 && current_field == NumberField::Minor;
        } else if reached {
            if current.is_none() && !fill_optional && !mandatory.contains(&current_field) {
                continue;
            }
            bumped.set(current_field, Some(0));
        }
    }

    Ok(bumped)
}

/// Signed difference of two numbers, saturating at the bounds of `i64`
pub(crate) fn difference(this: u64, other: u64) -> i64 {
    let diff = i128::from(this) - i128::from(other);
    diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Signed difference of two optional numbers, undefined numbers counting as 0
pub(crate) fn optional_difference(this: Option<u64>, other: Option<u64>) -> i64 {
    difference(this.unwrap_or(0), other.unwrap_or(0))
}
