//! # Addrparse Core
//!
//! Best-effort extraction of zip code, state and city from free-form
//! postal addresses. Tokens are matched, last to first, against reference
//! tables of valid zip codes, city names and state aliases.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use addrparse_core::{AddressParser, ReferenceData};
//!
//! let mut builder = ReferenceData::builder();
//! builder
//!     .add_state("CA", "California", ["Calif."])
//!     .add_location("93277", "Visalia", "CA");
//! let parser = AddressParser::with_reference(Arc::new(builder.build().unwrap())).unwrap();
//!
//! let result = parser.parse("Visalia").unwrap();
//! assert_eq!(result.city.as_deref(), Some("VISALIA"));
//! assert_eq!(result.state.as_deref(), Some("CA"));
//! assert_eq!(result.zip, None);
//! ```
pub mod error;
pub mod parser;
pub mod reference;
pub mod types;

#[cfg(test)]
mod test_fixtures;

// Re-export primary API
pub use error::{AddrParseError, Result};
pub use parser::{
    parse_address, AddressParser, Completeness, ParserConfig, PreprocessedAddress, Preprocessor,
    TokenResolver,
};
pub use reference::{load_reference_data, ReferenceData, ReferenceDataBuilder, ReferenceFilter};
pub use types::{AddressField, MatchPath, ParsedAddress};
