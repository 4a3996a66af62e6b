pub mod address;
pub mod field;

pub use address::ParsedAddress;
pub use field::{AddressField, MatchPath};
