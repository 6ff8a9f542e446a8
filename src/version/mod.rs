//! Version schemes used across Mozilla products
//!
//! Every scheme parses a string into an immutable value that can be compared with and
//! bumped into other values of the same scheme. Strings are matched against a grammar
//! first, then checked against the rules of the scheme. All violated rules are
//! reported at once.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Grammar   │────▶│ FieldMatch  │────▶│  Channel    │
//! │   (regex)   │     │  (numbers)  │     │ (detection) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ bump_numbers│◀────│   Version   │◀────│    Rules    │
//! │   (bump)    │     │  (compare)  │     │ (violations)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`base`]: plain `major.minor[.patch]` versions
//! - [`gecko`]: Firefox, Devedition, Fennec, Thunderbird and Snap versions
//! - [`mobile`]: Firefox for Android (Fenix) and Focus versions
//! - [`ios`]: Firefox for iOS versions
//! - [`maven`]: Android Components versions published to Maven
//! - [`balrog`]: `product-version-buildN` release names
//! - [`numbers`]: numeric fields and the shared bump engine
//! - [`traits`]: `Version` and `ReleaseChannel`, implemented by every scheme
//! - [`version_type`]: release channels and their ranks
//! - [`error`]: parsing, bumping and comparison errors

pub mod balrog;
pub mod base;
pub mod error;
pub mod gecko;
pub mod ios;
pub mod maven;
pub mod mobile;
pub mod numbers;
pub mod traits;
pub mod version_type;

/// Serializes a version as its canonical string and deserializes it by parsing.
macro_rules! impl_string_serde {
    ($version:ty) => {
        impl serde::Serialize for $version {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $version {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_string_serde;
