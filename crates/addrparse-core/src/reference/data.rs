use std::collections::{BTreeSet, HashMap};

use tracing::info;

use super::filter::ReferenceFilter;
use super::normalize_name;
use crate::error::{AddrParseError, Result};

/// Immutable lookup tables consulted while resolving addresses.
///
/// Built once through [`ReferenceDataBuilder`] and shared read-only
/// (typically behind an `Arc`) by every parse.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    zip_to_cities: HashMap<String, Vec<String>>,
    zip_to_states: HashMap<String, Vec<String>>,
    city_to_state: HashMap<String, String>,
    state_aliases: HashMap<String, Vec<String>>,
    inverse_state_aliases: HashMap<String, String>,
}

impl ReferenceData {
    /// Start building reference data.
    pub fn builder() -> ReferenceDataBuilder {
        ReferenceDataBuilder::new()
    }

    /// Returns `true` if `zip` anchors an address.
    #[must_use]
    pub fn contains_zip(&self, zip: &str) -> bool {
        self.zip_to_cities.contains_key(zip)
    }

    /// Candidate cities for a zip, in load order. Duplicates are kept.
    pub fn cities_for_zip(&self, zip: &str) -> Option<&[String]> {
        self.zip_to_cities.get(zip).map(Vec::as_slice)
    }

    /// Distinct candidate state codes for a zip, in first-seen order.
    pub fn states_for_zip(&self, zip: &str) -> Option<&[String]> {
        self.zip_to_states.get(zip).map(Vec::as_slice)
    }

    /// Canonical state for a city name.
    pub fn state_for_city(&self, city: &str) -> Option<&str> {
        self.city_to_state.get(city).map(String::as_str)
    }

    /// Returns `true` if `city` is a known city name.
    #[must_use]
    pub fn is_known_city(&self, city: &str) -> bool {
        self.city_to_state.contains_key(city)
    }

    /// Every recognized textual form of a state code, the code included.
    pub fn aliases_for_state(&self, code: &str) -> Option<&[String]> {
        self.state_aliases.get(code).map(Vec::as_slice)
    }

    /// Canonical state code for an alias such as "CALIFORNIA" or "CALIF".
    pub fn state_for_alias(&self, alias: &str) -> Option<&str> {
        self.inverse_state_aliases.get(alias).map(String::as_str)
    }

    /// Number of zip codes kept after filtering.
    #[must_use]
    pub fn zip_count(&self) -> usize {
        self.zip_to_cities.len()
    }

    /// Number of distinct city names.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.city_to_state.len()
    }

    /// Number of state codes with aliases.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.state_aliases.len()
    }
}

/// Accumulates raw reference rows and produces a validated [`ReferenceData`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataBuilder {
    zip_to_cities: HashMap<String, Vec<String>>,
    zip_to_states: HashMap<String, Vec<String>>,
    city_to_state: HashMap<String, String>,
    // Registration order drives alias collisions: the last state wins.
    states: Vec<(String, Vec<String>)>,
    filter: ReferenceFilter,
}

impl ReferenceDataBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `city` in `state` is served by `zip`.
    ///
    /// Appends to both candidate lists of the zip and maps the city to
    /// the state (a later row for the same city overrides earlier ones).
    pub fn add_location(&mut self, zip: &str, city: &str, state: &str) -> &mut Self {
        let zip = zip.trim();
        let city = normalize_name(city);
        let state = normalize_name(state);

        self.zip_to_cities
            .entry(zip.to_string())
            .or_default()
            .push(city.clone());
        self.zip_to_states
            .entry(zip.to_string())
            .or_default()
            .push(state.clone());
        self.city_to_state.insert(city, state);
        self
    }

    /// Append raw candidate cities for a zip without touching its states.
    pub fn add_zip_cities<I, S>(&mut self, zip: &str, cities: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.zip_to_cities
            .entry(zip.trim().to_string())
            .or_default()
            .extend(cities.into_iter().map(|c| normalize_name(c.as_ref())));
        self
    }

    /// Append raw candidate state codes for a zip without touching its cities.
    pub fn add_zip_states<I, S>(&mut self, zip: &str, states: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.zip_to_states
            .entry(zip.trim().to_string())
            .or_default()
            .extend(states.into_iter().map(|s| normalize_name(s.as_ref())));
        self
    }

    /// Map a city to its canonical state without registering a zip.
    pub fn add_city(&mut self, city: &str, state: &str) -> &mut Self {
        self.city_to_state
            .insert(normalize_name(city), normalize_name(state));
        self
    }

    /// Register a state code with its full name and extra aliases.
    ///
    /// Aliases are stored as `aliases..., name, code`. Re-registering a
    /// code replaces its aliases but keeps its original position.
    pub fn add_state<I, S>(&mut self, code: &str, name: &str, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let code = normalize_name(code);
        let mut forms: Vec<String> = aliases
            .into_iter()
            .map(|a| normalize_name(a.as_ref()))
            .filter(|a| !a.is_empty())
            .collect();
        forms.push(normalize_name(name));
        forms.push(code.clone());

        match self.states.iter_mut().find(|(c, _)| *c == code) {
            Some((_, existing)) => *existing = forms,
            None => self.states.push((code, forms)),
        }
        self
    }

    /// Restrict the zips kept by [`build`](Self::build).
    pub fn filter(&mut self, filter: ReferenceFilter) -> &mut Self {
        self.filter = filter;
        self
    }

    /// Validate the collected rows and produce the lookup tables.
    ///
    /// The allow-list filter runs first, so only the zips it keeps are
    /// validated.
    ///
    /// # Errors
    ///
    /// - `AddrParseError::MisalignedReference` if a zip has cities but no
    ///   states, or states but no cities.
    /// - `AddrParseError::UnknownStateCode` if a zip lists a state code
    ///   that was never registered with [`add_state`](Self::add_state).
    pub fn build(&self) -> Result<ReferenceData> {
        let mut zip_to_states: HashMap<String, Vec<String>> = self
            .zip_to_states
            .iter()
            .map(|(zip, states)| {
                let mut distinct = Vec::with_capacity(states.len());
                for state in states {
                    if !distinct.contains(state) {
                        distinct.push(state.clone());
                    }
                }
                (zip.clone(), distinct)
            })
            .collect();

        let mut zip_to_cities = self.zip_to_cities.clone();
        if !self.filter.is_unrestricted() {
            let before = zip_to_cities.len();
            zip_to_cities.retain(|zip, cities| {
                let states = zip_to_states.get(zip).map(Vec::as_slice).unwrap_or(&[]);
                self.filter.retains(zip, cities, states)
            });
            zip_to_states.retain(|zip, states| {
                let cities = self.zip_to_cities.get(zip).map(Vec::as_slice).unwrap_or(&[]);
                self.filter.retains(zip, cities, states)
            });
            info!(before, after = zip_to_cities.len(), "Filtered reference zip codes");
        }

        let mut misaligned: BTreeSet<&String> = zip_to_cities
            .keys()
            .filter(|zip| !zip_to_states.contains_key(*zip))
            .collect();
        misaligned.extend(
            zip_to_states
                .keys()
                .filter(|zip| !zip_to_cities.contains_key(*zip)),
        );
        if let Some(zip) = misaligned.first() {
            return Err(AddrParseError::MisalignedReference {
                zip: (*zip).clone(),
            });
        }

        let mut state_aliases = HashMap::with_capacity(self.states.len());
        let mut inverse_state_aliases = HashMap::new();
        for (code, forms) in &self.states {
            for form in forms {
                inverse_state_aliases.insert(form.clone(), code.clone());
            }
            state_aliases.insert(code.clone(), forms.clone());
        }

        let mut unknown: Vec<(&String, &String)> = zip_to_states
            .iter()
            .flat_map(|(zip, codes)| codes.iter().map(move |code| (zip, code)))
            .filter(|(_, code)| !state_aliases.contains_key(*code))
            .collect();
        unknown.sort();
        if let Some((zip, code)) = unknown.first() {
            return Err(AddrParseError::UnknownStateCode {
                zip: (*zip).clone(),
                code: (*code).clone(),
            });
        }

        info!(
            zips = zip_to_cities.len(),
            cities = self.city_to_state.len(),
            states = state_aliases.len(),
            "Built reference data"
        );

        Ok(ReferenceData {
            zip_to_cities,
            zip_to_states,
            city_to_state: self.city_to_state.clone(),
            state_aliases,
            inverse_state_aliases,
        })
    }
}
