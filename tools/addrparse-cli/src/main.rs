//! Address parsing CLI.
//!
//! Loads the zip/city and state-name reference files, then parses each
//! address given on the command line (or each stdin line) and prints one
//! JSON object per address.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use addrparse_core::{
    load_reference_data, AddrParseError, AddressField, AddressParser, Completeness, MatchPath,
    ParsedAddress, ParserConfig, ReferenceFilter,
};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "addrparse")]
#[command(about = "Extract zip code, state and city from free-form addresses")]
#[command(version)]
struct Cli {
    /// Zip/city reference CSV (Zipcode,City,State,LocationType)
    #[arg(short = 'z', long, env = "ADDRPARSE_ZIP_FILE")]
    zip_file: PathBuf,

    /// State names reference TSV (Name, Aliases, Postal Code)
    #[arg(short = 's', long, env = "ADDRPARSE_STATE_FILE")]
    state_file: PathBuf,

    /// Only keep zips serving one of these cities (repeatable)
    #[arg(long = "city")]
    cities: Vec<String>,

    /// Only keep zips in one of these states (repeatable)
    #[arg(long = "state")]
    states: Vec<String>,

    /// Only keep these zip codes (repeatable)
    #[arg(long = "zip")]
    zips: Vec<String>,

    /// Report addresses missing zip, state or city as errors
    #[arg(long)]
    strict: bool,

    /// Log resolution details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Addresses to parse; reads stdin lines when omitted
    addresses: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ParseOutput {
    input: String,
    zip: Option<String>,
    state: Option<String>,
    city: Option<String>,
    unmatched_tokens: Vec<String>,
    state_path: Option<MatchPath>,
    city_path: Option<MatchPath>,
    missing: Vec<AddressField>,
    error: Option<String>,
}

impl From<ParsedAddress> for ParseOutput {
    fn from(address: ParsedAddress) -> Self {
        let missing = address.missing_fields();
        Self {
            input: address.input,
            zip: address.zip,
            state: address.state,
            city: address.city,
            unmatched_tokens: address.unmatched_tokens,
            state_path: address.state_path,
            city_path: address.city_path,
            missing,
            error: None,
        }
    }
}

impl ParseOutput {
    fn failed(input: &str, error: &AddrParseError) -> Self {
        let missing = match error {
            AddrParseError::Incomplete { missing, .. } => missing.clone(),
            _ => Vec::new(),
        };
        Self {
            input: input.to_string(),
            zip: None,
            state: None,
            city: None,
            unmatched_tokens: Vec::new(),
            state_path: None,
            city_path: None,
            missing,
            error: Some(error.to_string()),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn emit(parser: &AddressParser, input: &str, out: &mut impl Write) -> Result<()> {
    let output = match parser.parse(input) {
        Ok(address) => ParseOutput::from(address),
        Err(e) => ParseOutput::failed(input, &e),
    };
    serde_json::to_writer(&mut *out, &output).context("failed to serialize result")?;
    writeln!(out).context("failed to write result")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let filter = ReferenceFilter::new()
        .with_cities(&cli.cities)
        .with_states(&cli.states)
        .with_zips(&cli.zips);
    let reference = load_reference_data(&cli.zip_file, &cli.state_file, filter)
        .context("failed to load reference data")?;
    info!(
        zips = reference.zip_count(),
        cities = reference.city_count(),
        states = reference.state_count(),
        "Reference data ready"
    );

    let completeness = if cli.strict {
        Completeness::Require
    } else {
        Completeness::Report
    };
    let config = ParserConfig::new()
        .with_completeness(completeness)
        .with_log_incomplete(cli.verbose);
    let parser = AddressParser::new(Arc::new(reference), config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.addresses.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            emit(&parser, line, &mut out)?;
        }
    } else {
        for address in &cli.addresses {
            emit(&parser, address, &mut out)?;
        }
    }

    Ok(())
}
