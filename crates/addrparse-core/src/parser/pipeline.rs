//! # Address Parser
//!
//! Ties preprocessing and token resolution together over shared
//! reference data, and applies the configured completeness policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::parser::preprocess::Preprocessor;
use crate::parser::resolver::TokenResolver;
use crate::reference::ReferenceData;
use crate::types::ParsedAddress;

/// What to do when a parse leaves zip, state or city unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completeness {
    /// Return the partial result; missing fields are only reported.
    #[default]
    Report,
    /// Fail with `AddrParseError::Incomplete`.
    Require,
}

/// Configuration for the parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Completeness policy applied after each scan
    pub completeness: Completeness,
    /// Whether to log a warning for incomplete addresses under `Report`
    pub log_incomplete: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            completeness: Completeness::Report,
            log_incomplete: true,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the completeness policy.
    pub fn with_completeness(mut self, completeness: Completeness) -> Self {
        self.completeness = completeness;
        self
    }

    /// Enable or disable the incomplete-address warning.
    pub fn with_log_incomplete(mut self, enabled: bool) -> Self {
        self.log_incomplete = enabled;
        self
    }
}

/// Parses free-form addresses against shared reference data.
///
/// Cheap to share: every parse owns its scan state, so one parser (or many
/// parsers over one `Arc<ReferenceData>`) can serve concurrent threads.
#[derive(Debug, Clone)]
pub struct AddressParser {
    config: ParserConfig,
    reference: Arc<ReferenceData>,
    preprocessor: Preprocessor,
    resolver: TokenResolver,
}

impl AddressParser {
    /// Create a new parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AddrParseError::RegexError` if a static pattern fails to compile.
    pub fn new(reference: Arc<ReferenceData>, config: ParserConfig) -> Result<Self> {
        Ok(Self {
            config,
            reference,
            preprocessor: Preprocessor::new()?,
            resolver: TokenResolver::new()?,
        })
    }

    /// Create a new parser with default configuration.
    ///
    /// # Errors
    ///
    /// Returns `AddrParseError::RegexError` if a static pattern fails to compile.
    pub fn with_reference(reference: Arc<ReferenceData>) -> Result<Self> {
        Self::new(reference, ParserConfig::default())
    }

    /// Parse a raw address string.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use addrparse_core::{AddressParser, ReferenceData};
    ///
    /// let mut builder = ReferenceData::builder();
    /// builder
    ///     .add_state("CA", "California", ["Calif."])
    ///     .add_location("94401", "San Mateo", "CA");
    /// let parser = AddressParser::with_reference(Arc::new(builder.build().unwrap())).unwrap();
    ///
    /// let result = parser.parse("888 N Kingston St. APT 1, San Mateo, CA, 94401").unwrap();
    /// assert_eq!(result.zip.as_deref(), Some("94401"));
    /// assert_eq!(result.state.as_deref(), Some("CA"));
    /// assert_eq!(result.city.as_deref(), Some("SAN MATEO"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `AddrParseError::Incomplete` under [`Completeness::Require`]
    /// when a field is missing, and reference-invariant errors from
    /// [`TokenResolver::resolve`].
    pub fn parse(&self, raw: &str) -> Result<ParsedAddress> {
        let preprocessed = self.preprocessor.preprocess(raw);
        let address = self
            .resolver
            .resolve(raw, &preprocessed.tokens, &self.reference)?;

        if !address.is_complete() {
            match self.config.completeness {
                Completeness::Require => address.ensure_complete()?,
                Completeness::Report if self.config.log_incomplete => {
                    let missing = address
                        .missing_fields()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    warn!(input = raw, missing = %missing, "Incomplete address");
                }
                Completeness::Report => {}
            }
        }

        Ok(address)
    }

    /// Get the reference data backing this parser.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Get the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

/// Convenience function to parse one address with default settings.
///
/// # Errors
///
/// See [`AddressParser::parse`].
pub fn parse_address(raw: &str, reference: Arc<ReferenceData>) -> Result<ParsedAddress> {
    AddressParser::with_reference(reference)?.parse(raw)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::error::AddrParseError;
    use crate::test_fixtures::fixture;
    use crate::types::AddressField;

    fn parser(config: ParserConfig) -> AddressParser {
        AddressParser::new(Arc::new(fixture()), config).unwrap()
    }

    #[test]
    fn test_parser_config() {
        let config = ParserConfig::new()
            .with_completeness(Completeness::Require)
            .with_log_incomplete(false);

        assert_eq!(config.completeness, Completeness::Require);
        assert!(!config.log_incomplete);
        assert_eq!(ParserConfig::default().completeness, Completeness::Report);
    }

    #[test]
    fn test_parse_complete_address() {
        let parser = parser(ParserConfig::new().with_completeness(Completeness::Require));
        let result = parser
            .parse("888 N Kingston St. APT 1, San Mateo, CA, 94401")
            .unwrap();

        assert_eq!(result.input, "888 N Kingston St. APT 1, San Mateo, CA, 94401");
        assert_eq!(result.zip.as_deref(), Some("94401"));
        assert_eq!(result.state.as_deref(), Some("CA"));
        assert_eq!(result.city.as_deref(), Some("SAN MATEO"));
    }

    #[test]
    fn test_report_returns_partial_result() {
        let parser = parser(ParserConfig::new());
        let result = parser.parse("Visalia").unwrap();

        assert_eq!(result.city.as_deref(), Some("VISALIA"));
        assert_eq!(result.missing_fields(), vec![AddressField::Zip]);
    }

    #[test]
    fn test_require_rejects_incomplete() {
        let parser = parser(ParserConfig::new().with_completeness(Completeness::Require));
        match parser.parse("West Virginia") {
            Err(AddrParseError::Incomplete { input, missing }) => {
                assert_eq!(input, "West Virginia");
                assert_eq!(missing, vec![AddressField::Zip, AddressField::City]);
            }
            other => panic!("expected incomplete, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty() {
        let result = parser(ParserConfig::new()).parse("").unwrap();
        assert_eq!(result.missing_fields(), AddressField::ALL.to_vec());
        assert!(result.unmatched_tokens.is_empty());
    }

    #[test]
    fn test_parse_convenience_function() {
        let result = parse_address("12312 sdfasdoiuwer, Green Bay", Arc::new(fixture())).unwrap();
        assert_eq!(result.state.as_deref(), Some("WI"));
    }

    #[test]
    fn test_shared_reference_across_threads() {
        let parser = Arc::new(parser(ParserConfig::new().with_log_incomplete(false)));
        let handles: Vec<_> = [
            "888 N Kingston St APT 1 San Mateo CA 94401",
            "Visalia",
            "West Virginia",
            "12312 sdfasdoiuwer, Burlingame, CA, 99999",
        ]
        .into_iter()
        .map(|input| {
            let parser = Arc::clone(&parser);
            thread::spawn(move || (parser.parse(input).unwrap(), parser.parse(input).unwrap()))
        })
        .collect();

        for handle in handles {
            let (first, second) = handle.join().unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_parser_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AddressParser>();
    }
}
