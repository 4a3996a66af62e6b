use std::collections::HashSet;

use super::normalize_name;

/// Allow lists that restrict which zip codes a [`ReferenceData`] keeps.
///
/// Filters are applied once, when the reference data is built. An empty
/// (or never supplied) list places no restriction.
///
/// [`ReferenceData`]: super::ReferenceData
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceFilter {
    cities: HashSet<String>,
    states: HashSet<String>,
    zips: HashSet<String>,
}

impl ReferenceFilter {
    /// Create a filter that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only zips with at least one candidate city in `cities`.
    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cities = cities.into_iter().map(|c| normalize_name(c.as_ref())).collect();
        self
    }

    /// Keep only zips with at least one candidate state code in `states`.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.states = states.into_iter().map(|s| normalize_name(s.as_ref())).collect();
        self
    }

    /// Keep only the listed zip codes.
    pub fn with_zips<I, S>(mut self, zips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.zips = zips.into_iter().map(|z| z.as_ref().trim().to_string()).collect();
        self
    }

    /// Returns `true` if no allow list is active.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.cities.is_empty() && self.states.is_empty() && self.zips.is_empty()
    }

    /// Decides whether a zip entry survives the filter.
    pub(crate) fn retains(&self, zip: &str, cities: &[String], states: &[String]) -> bool {
        if !self.zips.is_empty() && !self.zips.contains(zip) {
            return false;
        }
        if !self.cities.is_empty() && !cities.iter().any(|c| self.cities.contains(c)) {
            return false;
        }
        if !self.states.is_empty() && !states.iter().any(|s| self.states.contains(s)) {
            return false;
        }
        true
    }
}
