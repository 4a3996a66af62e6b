use regex::Regex;
use tracing::{debug, trace};

use crate::error::{AddrParseError, Result};
use crate::reference::ReferenceData;
use crate::types::{MatchPath, ParsedAddress};

/// Per-parse scan state: the most recent token that matched nothing.
///
/// Tokens are visited last-to-first, so the buffered token is the one that
/// follows the current token in the text. Joining them rebuilds two-word
/// names such as "SAINT LOUIS" or "WEST VIRGINIA".
#[derive(Debug, Default)]
struct ScanState {
    last_unmatched: Option<String>,
}

impl ScanState {
    /// `"<token> <last unmatched>"`, or the token itself with an empty buffer.
    fn alternative(&self, token: &str) -> String {
        match &self.last_unmatched {
            Some(previous) => format!("{token} {previous}"),
            None => token.to_string(),
        }
    }
}

/// Resolves zip, state and city by scanning tokens in reverse.
///
/// Each uppercased token is tried, in order, as a zip code, as a state
/// alias of the anchoring zip, as a city of the anchoring zip, and finally
/// against the fallback search over every known alias and city. Tokens
/// that no step consumes are recorded as unmatched.
#[derive(Debug, Clone)]
pub struct TokenResolver {
    re_zip: Regex,
}

impl TokenResolver {
    /// Constructs a new `TokenResolver`.
    ///
    /// # Errors
    ///
    /// Returns `AddrParseError::RegexError` if the zip pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_zip: Regex::new(r"[0-9]{5}")?,
        })
    }

    /// Resolves `tokens` (in reading order) against `reference`.
    ///
    /// # Errors
    ///
    /// Fails only when `reference` breaks its own invariants: an anchoring
    /// zip without a state candidate list (`MisalignedReference`) or a
    /// candidate state code without aliases (`UnknownStateCode`).
    pub fn resolve<S: AsRef<str>>(
        &self,
        input: &str,
        tokens: &[S],
        reference: &ReferenceData,
    ) -> Result<ParsedAddress> {
        let mut address = ParsedAddress::new(input);
        let mut scan = ScanState::default();

        for raw in tokens.iter().rev() {
            let token = raw.as_ref().trim().to_uppercase();
            if token.is_empty() {
                continue;
            }
            let alternative = scan.alternative(&token);
            trace!(token = %token, alternative = %alternative, "Scanning token");

            if self.match_zip(&token, &mut address, reference) {
                continue;
            }
            if match_state(&token, &alternative, &mut address, reference)? {
                continue;
            }
            if match_city(&token, &alternative, &mut address, reference)? {
                continue;
            }
            if guess_unmatched(&token, &alternative, &mut address, reference) {
                // Fields never change once set, so the scan simply runs on.
                trace!(token = %token, "Address already resolved");
            }

            scan.last_unmatched = Some(token.clone());
            address.unmatched_tokens.push(token);
        }

        Ok(address)
    }

    fn match_zip(
        &self,
        token: &str,
        address: &mut ParsedAddress,
        reference: &ReferenceData,
    ) -> bool {
        if address.zip.is_some() {
            return false;
        }
        let Some(candidate) = self.re_zip.find(token) else {
            return false;
        };
        if !reference.contains_zip(candidate.as_str()) {
            return false;
        }
        address.set_zip(candidate.as_str());
        debug!(token, zip = candidate.as_str(), "Matched zip");
        true
    }
}

/// Matches the token against every alias of the anchoring zip's states.
///
/// A hit consumes the token even when the state is already set.
fn match_state(
    token: &str,
    alternative: &str,
    address: &mut ParsedAddress,
    reference: &ReferenceData,
) -> Result<bool> {
    let Some(zip) = address.zip.as_deref() else {
        return Ok(false);
    };

    let codes = reference
        .states_for_zip(zip)
        .ok_or_else(|| AddrParseError::MisalignedReference {
            zip: zip.to_string(),
        })?;

    for code in codes {
        let aliases =
            reference
                .aliases_for_state(code)
                .ok_or_else(|| AddrParseError::UnknownStateCode {
                    zip: zip.to_string(),
                    code: code.clone(),
                })?;
        if aliases.iter().any(|a| a == token || a == alternative) {
            if address.set_state(code, MatchPath::ZipCandidate) {
                debug!(token, state = %code, "Matched state of zip");
            }
            return Ok(true);
        }
    }
    Ok(false)
}

/// Matches the token against the anchoring zip's candidate cities.
fn match_city(
    token: &str,
    alternative: &str,
    address: &mut ParsedAddress,
    reference: &ReferenceData,
) -> Result<bool> {
    let Some(zip) = address.zip.as_deref() else {
        return Ok(false);
    };

    let cities = reference
        .cities_for_zip(zip)
        .ok_or_else(|| AddrParseError::MisalignedReference {
            zip: zip.to_string(),
        })?;

    match cities.iter().find(|c| *c == token || *c == alternative) {
        Some(city) => {
            if address.set_city(city, MatchPath::ZipCandidate) {
                debug!(token, city = %city, "Matched city of zip");
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Brute-force search used when the zip did not (or could not) settle the
/// token. Never consumes the token; returns `true` when zip, state and city
/// were all set before it ran.
fn guess_unmatched(
    token: &str,
    alternative: &str,
    address: &mut ParsedAddress,
    reference: &ReferenceData,
) -> bool {
    if address.is_complete() {
        return true;
    }

    let state_by_token = reference.state_for_alias(token);
    let state_by_alternative = reference.state_for_alias(alternative);
    let state_by_city = address
        .city
        .as_deref()
        .and_then(|city| reference.state_for_city(city));

    if alternative != token {
        if let Some(code) = state_by_alternative.or(state_by_city) {
            if address.set_state(code, MatchPath::Fallback) {
                debug!(alternative, state = code, "Guessed state from two-word form");
            }
        }
        if reference.is_known_city(alternative)
            && address.set_city(alternative, MatchPath::Fallback)
        {
            debug!(alternative, "Guessed two-word city");
        }
    }

    if address.city.is_none() && reference.is_known_city(token) {
        address.set_city(token, MatchPath::Fallback);
        debug!(token, "Guessed city");
    }

    let state_by_city = address
        .city
        .as_deref()
        .and_then(|city| reference.state_for_city(city));

    if let Some(code) = state_by_token.or(state_by_city) {
        if address.set_state(code, MatchPath::Fallback) {
            debug!(token, state = code, "Guessed state");
        }
    }

    false
}
