use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the structured fields a parse tries to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AddressField {
    Zip,
    State,
    City,
}

impl AddressField {
    /// All fields, in the order completeness is reported.
    pub const ALL: [Self; 3] = [Self::Zip, Self::State, Self::City];
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip => write!(f, "zip code"),
            Self::State => write!(f, "state"),
            Self::City => write!(f, "city"),
        }
    }
}

/// How a state or city value was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPath {
    /// Matched against the candidate list of the anchoring zip code.
    ZipCandidate,
    /// Found by the brute-force search over all known aliases and cities.
    /// A state set this way need not belong to the zip's candidates.
    Fallback,
}

impl fmt::Display for MatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZipCandidate => write!(f, "zip"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}
