//! Parse, validate, compare and bump version numbers of Mozilla products
//!
//! ```
//! use mozilla_version::{FirefoxVersion, NumberField, ReleaseChannel, Version};
//!
//! let version: FirefoxVersion = "60.0b3".parse().unwrap();
//! assert!(version.is_beta());
//! assert!(version < "60.0".parse().unwrap());
//! assert_eq!(version.bump(NumberField::Major).unwrap().to_string(), "61.0b1");
//! ```

pub mod config;
pub mod parser;
pub mod product;
pub mod version;

pub use product::{Product, ProductVersion};
pub use version::balrog::BalrogReleaseName;
pub use version::base::BaseVersion;
pub use version::error::{Error, Result};
pub use version::gecko::{
    BuildStyle, DeveditionVersion, FennecVersion, FirefoxVersion, GeckoFlavor, GeckoParts,
    GeckoSnapVersion, GeckoVersion, ThunderbirdVersion,
};
pub use version::ios::MobileIosVersion;
pub use version::maven::MavenVersion;
pub use version::mobile::{FenixVersion, MobileParts, MobileVersion};
pub use version::numbers::NumberField;
pub use version::traits::{ReleaseChannel, Version};
pub use version::version_type::VersionType;
