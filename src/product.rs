//! Mozilla products and the version scheme each one ships with

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::version::error::{Error, Result};
use crate::version::gecko::{DeveditionVersion, FennecVersion, FirefoxVersion, ThunderbirdVersion};
use crate::version::mobile::FenixVersion;
use crate::version::traits::{ReleaseChannel, Version};
use crate::version::version_type::VersionType;

/// Product names as they appear in release names (`firefox-60.0.1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    /// Firefox Developer Edition
    Devedition,
    /// Firefox for Android
    Fenix,
    /// Firefox for Android, up to 68
    Fennec,
    Firefox,
    Thunderbird,
}

impl Product {
    pub const ALL: [Product; 5] = [
        Product::Devedition,
        Product::Fenix,
        Product::Fennec,
        Product::Firefox,
        Product::Thunderbird,
    ];

    /// Returns the string representation of the product
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Devedition => "devedition",
            Product::Fenix => "fenix",
            Product::Fennec => "fennec",
            Product::Firefox => "firefox",
            Product::Thunderbird => "thunderbird",
        }
    }

    /// Whether release names of this product go through Balrog, the update server
    pub fn supports_balrog(&self) -> bool {
        !matches!(self, Product::Fenix)
    }

    /// Parses `version` with the scheme of this product
    pub fn parse_version(&self, version: &str) -> Result<ProductVersion> {
        let parsed = match self {
            Product::Devedition => ProductVersion::Devedition(version.parse()?),
            Product::Fenix => ProductVersion::Fenix(version.parse()?),
            Product::Fennec => ProductVersion::Fennec(version.parse()?),
            Product::Firefox => ProductVersion::Firefox(version.parse()?),
            Product::Thunderbird => ProductVersion::Thunderbird(version.parse()?),
        };
        Ok(parsed)
    }
}

impl std::str::FromStr for Product {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "devedition" => Ok(Product::Devedition),
            "fenix" => Ok(Product::Fenix),
            "fennec" => Ok(Product::Fennec),
            "firefox" => Ok(Product::Firefox),
            "thunderbird" => Ok(Product::Thunderbird),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version tied to the product it was parsed for
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum ProductVersion {
    Devedition(DeveditionVersion),
    Fenix(FenixVersion),
    Fennec(FennecVersion),
    Firefox(FirefoxVersion),
    Thunderbird(ThunderbirdVersion),
}

impl ProductVersion {
    /// Parses a `product-version` release, e.g. `firefox-60.0.1` or `Fennec-68.4`.
    ///
    /// The product name is case-insensitive.
    pub fn parse_release(release: &str) -> Result<Self> {
        let product = release
            .split_once('-')
            .and_then(|(product, version)| {
                product
                    .to_lowercase()
                    .parse::<Product>()
                    .ok()
                    .map(|product| (product, version))
            });
        let Some((product, version)) = product else {
            debug!("No known product in release '{}'", release);
            return Err(Error::pattern_not_matched(release, "unknown product"));
        };
        product.parse_version(version)
    }

    pub fn product(&self) -> Product {
        match self {
            ProductVersion::Devedition(_) => Product::Devedition,
            ProductVersion::Fenix(_) => Product::Fenix,
            ProductVersion::Fennec(_) => Product::Fennec,
            ProductVersion::Firefox(_) => Product::Firefox,
            ProductVersion::Thunderbird(_) => Product::Thunderbird,
        }
    }

    pub fn major_number(&self) -> u64 {
        match self {
            ProductVersion::Devedition(v) => v.major_number(),
            ProductVersion::Fenix(v) => v.major_number(),
            ProductVersion::Fennec(v) => v.major_number(),
            ProductVersion::Firefox(v) => v.major_number(),
            ProductVersion::Thunderbird(v) => v.major_number(),
        }
    }

    pub fn build_number(&self) -> Option<u64> {
        match self {
            ProductVersion::Devedition(v) => v.build_number(),
            ProductVersion::Fenix(v) => v.build_number(),
            ProductVersion::Fennec(v) => v.build_number(),
            ProductVersion::Firefox(v) => v.build_number(),
            ProductVersion::Thunderbird(v) => v.build_number(),
        }
    }

    /// Compares two versions of the same product. Versions of different products are
    /// not comparable.
    pub fn compare(&self, other: &Self) -> Option<i64> {
        match (self, other) {
            (ProductVersion::Devedition(a), ProductVersion::Devedition(b)) => Some(a.compare(b)),
            (ProductVersion::Fenix(a), ProductVersion::Fenix(b)) => Some(a.compare(b)),
            (ProductVersion::Fennec(a), ProductVersion::Fennec(b)) => Some(a.compare(b)),
            (ProductVersion::Firefox(a), ProductVersion::Firefox(b)) => Some(a.compare(b)),
            (ProductVersion::Thunderbird(a), ProductVersion::Thunderbird(b)) => {
                Some(a.compare(b))
            }
            _ => None,
        }
    }
}

impl ReleaseChannel for ProductVersion {
    fn version_type(&self) -> VersionType {
        match self {
            ProductVersion::Devedition(v) => v.version_type(),
            ProductVersion::Fenix(v) => v.version_type(),
            ProductVersion::Fennec(v) => v.version_type(),
            ProductVersion::Firefox(v) => v.version_type(),
            ProductVersion::Thunderbird(v) => v.version_type(),
        }
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductVersion::Devedition(v) => fmt::Display::fmt(v, f),
            ProductVersion::Fenix(v) => fmt::Display::fmt(v, f),
            ProductVersion::Fennec(v) => fmt::Display::fmt(v, f),
            ProductVersion::Firefox(v) => fmt::Display::fmt(v, f),
            ProductVersion::Thunderbird(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl PartialEq for ProductVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(0)
    }
}

impl PartialOrd for ProductVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).map(|diff| diff.cmp(&0))
    }
}
