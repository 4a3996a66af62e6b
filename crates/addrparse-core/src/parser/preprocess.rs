//! # Address Preprocessor
//!
//! Normalizes raw address text and splits it into tokens.
//! Case is left untouched; the resolver uppercases each token.

use regex::Regex;

/// Output of [`Preprocessor::preprocess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessedAddress {
    /// Normalized text with commas and semicolons turned into spaces.
    pub normalized: String,
    /// Comma-separated segments of the cleaned text, trimmed, empties dropped.
    pub segments: Vec<String>,
    /// Whitespace-delimited tokens in reading order.
    pub tokens: Vec<String>,
}

/// Turns raw address strings into token sequences.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    re_empty_segment: Regex,
}

impl Preprocessor {
    /// Create a new preprocessor instance.
    ///
    /// # Errors
    ///
    /// Returns `AddrParseError::RegexError` if the static pattern fails to compile.
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            re_empty_segment: Regex::new(r",\s*,")?,
        })
    }

    /// Normalize and tokenize an address.
    ///
    /// Substitutions are applied to the whole string, in order:
    /// `"# "` to `"#"`, `" &"` to `"&"`, hyphens to spaces, blank comma
    /// segments collapsed, outer whitespace trimmed, periods removed. The
    /// result is split on commas for `segments`, then commas and semicolons
    /// become spaces and the text is split on whitespace for `tokens`.
    ///
    /// # Examples
    /// ```
    /// use addrparse_core::parser::Preprocessor;
    ///
    /// let preprocessor = Preprocessor::new().unwrap();
    /// let address = preprocessor.preprocess("12-B Main St., Apt # 4, Visalia;CA");
    /// assert_eq!(
    ///     address.tokens,
    ///     ["12", "B", "Main", "St", "Apt", "#4", "Visalia", "CA"]
    /// );
    /// ```
    pub fn preprocess(&self, raw: &str) -> PreprocessedAddress {
        let address = raw.replace("# ", "#").replace(" &", "&").replace('-', " ");
        let address = self.re_empty_segment.replace_all(&address, ",");
        let address = address.trim().replace('.', "");

        let segments = address
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        let normalized = address.replace([',', ';'], " ");
        let tokens = normalized.split_whitespace().map(str::to_string).collect();

        PreprocessedAddress {
            normalized,
            segments,
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocess(raw: &str) -> PreprocessedAddress {
        Preprocessor::new().unwrap().preprocess(raw)
    }

    #[test]
    fn test_preprocess_basic() {
        let address = preprocess("888 N Kingston St. APT 1, San Mateo, CA, 94401");
        assert_eq!(
            address.tokens,
            ["888", "N", "Kingston", "St", "APT", "1", "San", "Mateo", "CA", "94401"]
        );
        assert_eq!(
            address.segments,
            ["888 N Kingston St APT 1", "San Mateo", "CA", "94401"]
        );
    }

    #[test]
    fn test_unit_marker_and_ampersand_stay_attached() {
        let address = preprocess("Suite # 200 & Annex");
        assert_eq!(address.tokens, ["Suite", "#200&", "Annex"]);
    }

    #[test]
    fn test_hyphens_split_tokens() {
        let address = preprocess("123-45 Wilkes-Barre");
        assert_eq!(address.tokens, ["123", "45", "Wilkes", "Barre"]);
    }

    #[test]
    fn test_blank_segments_collapse() {
        let address = preprocess("1 Main St, , Visalia,,CA");
        assert_eq!(address.segments, ["1 Main St", "Visalia", "CA"]);
        assert_eq!(address.tokens, ["1", "Main", "St", "Visalia", "CA"]);
    }

    #[test]
    fn test_semicolons_become_spaces() {
        let address = preprocess("123123 a;lsdfj as;dlkf, San Francisco");
        assert_eq!(
            address.tokens,
            ["123123", "a", "lsdfj", "as", "dlkf", "San", "Francisco"]
        );
        // Semicolons do not split segments.
        assert_eq!(address.segments, ["123123 a;lsdfj as;dlkf", "San Francisco"]);
    }

    #[test]
    fn test_case_is_preserved() {
        let address = preprocess("  visalia  ");
        assert_eq!(address.tokens, ["visalia"]);
        assert_eq!(address.normalized, "visalia");
    }

    #[test]
    fn test_preprocess_empty() {
        let address = preprocess("");
        assert!(address.tokens.is_empty());
        assert!(address.segments.is_empty());

        let address = preprocess(" , .; ");
        assert!(address.tokens.is_empty());
    }
}
