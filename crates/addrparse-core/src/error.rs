use thiserror::Error;

use crate::types::AddressField;

/// Errors that can occur during address parsing and reference-data loading.
#[derive(Debug, Error)]
pub enum AddrParseError {
    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// A reference file could not be read as CSV/TSV.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// Path (or label) of the reference source.
        path: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// A reference file could not be opened.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A reference file lacks a required header.
    #[error("{path} is missing required column {column:?}")]
    MissingColumn {
        /// Path (or label) of the reference source.
        path: String,
        /// The header that was expected.
        column: &'static str,
    },

    /// A zip code is keyed in only one of the city and state candidate maps.
    #[error("reference data is misaligned: zip {zip} lacks a city or state candidate list")]
    MisalignedReference {
        /// The offending zip code.
        zip: String,
    },

    /// A zip lists a state code that has no alias entry.
    #[error("zip {zip} references state code {code:?} with no known aliases")]
    UnknownStateCode {
        /// The zip whose candidates contain the code.
        zip: String,
        /// The state code without aliases.
        code: String,
    },

    /// The address was parsed but one or more fields could not be resolved.
    #[error("address {input:?} missing {}", join_fields(.missing))]
    Incomplete {
        /// The raw input.
        input: String,
        /// Fields that were left unset.
        missing: Vec<AddressField>,
    },
}

fn join_fields(fields: &[AddressField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for address parsing operations.
pub type Result<T> = std::result::Result<T, AddrParseError>;
