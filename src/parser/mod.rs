//! Parser helpers
//! - fields.rs: named field extraction (FieldMatch) and number coercion
//! - channel.rs: mutually exclusive channel detection

pub mod channel;
pub mod fields;

pub use channel::find_version_type;
pub use fields::{FieldMatch, positive_int, strictly_positive};
