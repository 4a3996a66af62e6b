//! # Reference Data
//!
//! Lookup tables of valid zip codes, cities and state aliases, plus the
//! loaders that read them from the zip/city CSV and state-name TSV files.

pub mod data;
pub mod filter;
pub mod loader;

pub use data::{ReferenceData, ReferenceDataBuilder};
pub use filter::ReferenceFilter;
pub use loader::{load_reference_data, read_locations, read_state_names};

/// Canonical form for names and codes: trimmed, uppercased, periods removed.
pub(crate) fn normalize_name(value: &str) -> String {
    value.trim().to_uppercase().replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_strips_periods_and_case() {
        assert_eq!(normalize_name("  St. Louis "), "ST LOUIS");
        assert_eq!(normalize_name("D.C."), "DC");
        assert_eq!(normalize_name(""), "");
    }
}
