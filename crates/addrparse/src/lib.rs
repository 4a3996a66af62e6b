//! # Addrparse
//!
//! Parses unstructured postal address text into zip code, state and city.
//! See [`addrparse_core`] for the engine; this crate re-exports its API.

pub use addrparse_core::*;
