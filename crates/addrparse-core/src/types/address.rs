use serde::{Deserialize, Serialize};

use super::field::{AddressField, MatchPath};
use crate::error::{AddrParseError, Result};

/// The primary output of the address parser.
///
/// Fields are filled at most once during a scan: the first token that
/// resolves a field wins and later tokens never replace it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    /// Original input string.
    pub input: String,

    /// Five-digit postal code present in the reference data.
    pub zip: Option<String>,

    /// Canonical state/region code (e.g. "CA").
    pub state: Option<String>,

    /// Uppercased city name as it appears in the reference data.
    pub city: Option<String>,

    /// Uppercased tokens that resolved nothing, in scan (reverse) order.
    pub unmatched_tokens: Vec<String>,

    /// How `state` was resolved.
    pub state_path: Option<MatchPath>,

    /// How `city` was resolved.
    pub city_path: Option<MatchPath>,
}

impl ParsedAddress {
    /// Creates a new empty `ParsedAddress` for the given input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            zip: None,
            state: None,
            city: None,
            unmatched_tokens: Vec::new(),
            state_path: None,
            city_path: None,
        }
    }

    /// Returns `true` once zip, state and city are all resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.zip.is_some() && self.state.is_some() && self.city.is_some()
    }

    /// Lists the fields left unresolved, in zip/state/city order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<AddressField> {
        AddressField::ALL
            .into_iter()
            .filter(|field| self.field(*field).is_none())
            .collect()
    }

    /// Returns the value of a single field.
    #[must_use]
    pub fn field(&self, field: AddressField) -> Option<&str> {
        match field {
            AddressField::Zip => self.zip.as_deref(),
            AddressField::State => self.state.as_deref(),
            AddressField::City => self.city.as_deref(),
        }
    }

    /// Succeeds only if every field was resolved.
    ///
    /// # Errors
    ///
    /// Returns `AddrParseError::Incomplete` naming each missing field.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AddrParseError::Incomplete {
                input: self.input.clone(),
                missing,
            })
        }
    }

    pub(crate) fn set_zip(&mut self, zip: &str) -> bool {
        if self.zip.is_some() {
            return false;
        }
        self.zip = Some(zip.to_string());
        true
    }

    pub(crate) fn set_state(&mut self, code: &str, path: MatchPath) -> bool {
        if self.state.is_some() {
            return false;
        }
        self.state = Some(code.to_string());
        self.state_path = Some(path);
        true
    }

    pub(crate) fn set_city(&mut self, city: &str, path: MatchPath) -> bool {
        if self.city.is_some() {
            return false;
        }
        self.city = Some(city.to_string());
        self.city_path = Some(path);
        true
    }
}

impl std::fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParsedAddress(")?;
        write!(f, "zip={}", self.zip.as_deref().unwrap_or("-"))?;
        write!(f, ", state={}", self.state.as_deref().unwrap_or("-"))?;
        write!(f, ", city={}", self.city.as_deref().unwrap_or("-"))?;
        if !self.unmatched_tokens.is_empty() {
            write!(f, ", unmatched={}", self.unmatched_tokens.len())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_parsed_address_is_empty() {
        let address = ParsedAddress::new("test input");
        assert_eq!(address.input, "test input");
        assert!(!address.is_complete());
        assert_eq!(address.missing_fields(), AddressField::ALL.to_vec());
        assert!(address.unmatched_tokens.is_empty());
    }

    #[test]
    fn setters_never_overwrite() {
        let mut address = ParsedAddress::new("x");
        assert!(address.set_zip("94401"));
        assert!(!address.set_zip("94010"));
        assert!(address.set_state("CA", MatchPath::ZipCandidate));
        assert!(!address.set_state("NV", MatchPath::Fallback));
        assert!(address.set_city("SAN MATEO", MatchPath::Fallback));
        assert!(!address.set_city("BURLINGAME", MatchPath::ZipCandidate));

        assert_eq!(address.zip.as_deref(), Some("94401"));
        assert_eq!(address.state.as_deref(), Some("CA"));
        assert_eq!(address.state_path, Some(MatchPath::ZipCandidate));
        assert_eq!(address.city.as_deref(), Some("SAN MATEO"));
        assert_eq!(address.city_path, Some(MatchPath::Fallback));
        assert!(address.is_complete());
    }

    #[test]
    fn ensure_complete_reports_missing() {
        let mut address = ParsedAddress::new("Visalia");
        address.set_city("VISALIA", MatchPath::Fallback);
        address.set_state("CA", MatchPath::Fallback);

        match address.ensure_complete() {
            Err(AddrParseError::Incomplete { input, missing }) => {
                assert_eq!(input, "Visalia");
                assert_eq!(missing, vec![AddressField::Zip]);
            }
            other => panic!("expected incomplete, got {other:?}"),
        }

        address.set_zip("93277");
        assert!(address.ensure_complete().is_ok());
    }

    #[test]
    fn parsed_address_display() {
        let mut address = ParsedAddress::new("test");
        address.set_zip("94401");
        address.set_city("SAN MATEO", MatchPath::ZipCandidate);
        address.unmatched_tokens.push("APT".into());
        let display = address.to_string();
        assert!(display.contains("zip=94401"));
        assert!(display.contains("state=-"));
        assert!(display.contains("SAN MATEO"));
        assert!(display.contains("unmatched=1"));
    }

    #[test]
    fn parsed_address_serialization_roundtrip() {
        let mut address = ParsedAddress::new("888 N Kingston St, San Mateo, CA 94401");
        address.set_zip("94401");
        address.set_state("CA", MatchPath::ZipCandidate);
        address.set_city("SAN MATEO", MatchPath::ZipCandidate);
        address.unmatched_tokens = vec!["ST".into(), "KINGSTON".into()];

        let json = serde_json::to_string_pretty(&address).unwrap();
        let back: ParsedAddress = serde_json::from_str(&json).unwrap();

        assert_eq!(address, back);
    }
}
