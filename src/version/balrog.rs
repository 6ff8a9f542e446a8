//! Balrog release names: `firefox-60.0.1-build1`
//!
//! Balrog is the server delivering updates of Gecko-based desktop and Fennec builds.
//! A release name is the product, the version and the build number.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parser::FieldMatch;
use crate::product::{Product, ProductVersion};
use crate::version::error::{Error, Result};
use crate::version::numbers::NumberField;

static BALROG_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?P<product>[a-z]+)",
        r"-(?P<version>\d+\.\d+(\.\d+)?(a1|a2|b\d+|esr)?)",
        r"-build(?P<build_number>\d+)$",
    ))
    .unwrap()
});

#[derive(Debug, Clone, Copy)]
pub struct BalrogReleaseName {
    product: Product,
    version: ProductVersion,
}

impl BalrogReleaseName {
    /// Pairs a product with one of its versions. The version must carry a build number.
    pub fn new(version: ProductVersion) -> Result<Self> {
        let product = version.product();
        let release = format!("{product}-{version}");

        if !product.supports_balrog() {
            return Err(Error::pattern_not_matched(release, "unknown product"));
        }
        if version.build_number().is_none() {
            return Err(Error::MissingField {
                version: release,
                field: NumberField::Build.as_str().to_string(),
            });
        }

        Ok(Self { product, version })
    }

    pub fn parse(release: &str) -> Result<Self> {
        let fields = FieldMatch::capture(&BALROG_GRAMMAR, release).ok_or_else(|| {
            debug!("Balrog release '{}' does not match the grammar", release);
            Error::pattern_not_matched(release, BALROG_GRAMMAR.as_str())
        })?;

        let product = fields
            .mandatory("product")?
            .to_lowercase()
            .parse::<Product>()
            .ok()
            .filter(Product::supports_balrog)
            .ok_or_else(|| Error::pattern_not_matched(release, "unknown product"))?;

        let version = format!(
            "{}build{}",
            fields.mandatory("version")?,
            fields.mandatory(NumberField::Build.as_str())?
        );
        Self::new(product.parse_version(&version)?)
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn version(&self) -> &ProductVersion {
        &self.version
    }

    /// Compares the product names first, then the versions of the same product
    pub fn compare(&self, other: &Self) -> Option<i64> {
        match self.product.cmp(&other.product) {
            Ordering::Less => Some(-1),
            Ordering::Greater => Some(1),
            Ordering::Equal => self.version.compare(&other.version),
        }
    }
}

impl FromStr for BalrogReleaseName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BalrogReleaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.version.to_string().replace("build", "-build");
        write!(f, "{}-{}", self.product, version)
    }
}

impl PartialEq for BalrogReleaseName {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(0)
    }
}

impl PartialOrd for BalrogReleaseName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).map(|diff| diff.cmp(&0))
    }
}

crate::version::impl_string_serde!(BalrogReleaseName);
