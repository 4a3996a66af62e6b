//! Readers for the flat reference files.
//!
//! Zip/city file (comma separated, unquoted):
//!
//! ```text
//! Zipcode,City,State,LocationType
//! 94401,SAN MATEO,CA,PRIMARY
//! ```
//!
//! State names file (tab separated, unquoted, aliases comma separated):
//!
//! ```text
//! Name	Aliases	Postal Code
//! California	Calif.,Cal	CA
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::data::{ReferenceData, ReferenceDataBuilder};
use super::filter::ReferenceFilter;
use crate::error::{AddrParseError, Result};

/// Rows with this location type are not deliverable and are skipped.
const NOT_ACCEPTABLE: &str = "NOT ACCEPTABLE";

#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(rename = "Zipcode")]
    zipcode: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "LocationType")]
    location_type: String,
}

#[derive(Debug, Deserialize)]
struct StateNameRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Aliases")]
    aliases: String,
    #[serde(rename = "Postal Code")]
    postal_code: String,
}

fn reader_for<R: Read>(source: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(false)
        .trim(csv::Trim::Headers)
        .from_reader(source)
}

fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    label: &str,
    columns: &[&'static str],
) -> Result<()> {
    let headers = reader.headers().map_err(|e| AddrParseError::Csv {
        path: label.to_string(),
        source: e,
    })?;
    for &column in columns {
        if !headers.iter().any(|h| h == column) {
            return Err(AddrParseError::MissingColumn {
                path: label.to_string(),
                column,
            });
        }
    }
    Ok(())
}

/// Reads zip/city/state rows into `builder`.
///
/// `label` names the source in error messages. Returns the number of rows
/// added (skipped rows are not counted).
///
/// # Errors
///
/// Returns `AddrParseError::MissingColumn` if a header is absent and
/// `AddrParseError::Csv` on malformed rows.
pub fn read_locations<R: Read>(
    builder: &mut ReferenceDataBuilder,
    source: R,
    label: &str,
) -> Result<u64> {
    let mut reader = reader_for(source, b',');
    require_columns(&mut reader, label, &["Zipcode", "City", "State", "LocationType"])?;

    let mut count = 0u64;
    let mut skipped = 0u64;
    for row in reader.deserialize::<LocationRecord>() {
        let record = row.map_err(|e| AddrParseError::Csv {
            path: label.to_string(),
            source: e,
        })?;
        if record.location_type.trim() == NOT_ACCEPTABLE {
            skipped += 1;
            continue;
        }
        builder.add_location(&record.zipcode, &record.city, &record.state);
        count += 1;
    }

    debug!(label, count, skipped, "Read location rows");
    Ok(count)
}

/// Reads state name/alias rows into `builder`.
///
/// # Errors
///
/// Returns `AddrParseError::MissingColumn` if a header is absent and
/// `AddrParseError::Csv` on malformed rows.
pub fn read_state_names<R: Read>(
    builder: &mut ReferenceDataBuilder,
    source: R,
    label: &str,
) -> Result<u64> {
    let mut reader = reader_for(source, b'\t');
    require_columns(&mut reader, label, &["Name", "Aliases", "Postal Code"])?;

    let mut count = 0u64;
    for row in reader.deserialize::<StateNameRecord>() {
        let record = row.map_err(|e| AddrParseError::Csv {
            path: label.to_string(),
            source: e,
        })?;
        builder.add_state(
            &record.postal_code,
            &record.name,
            record.aliases.split(','),
        );
        count += 1;
    }

    debug!(label, count, "Read state name rows");
    Ok(count)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| AddrParseError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Loads both reference files and builds filtered [`ReferenceData`].
///
/// # Errors
///
/// Propagates I/O, CSV and validation errors.
pub fn load_reference_data(
    zip_path: &Path,
    state_path: &Path,
    filter: ReferenceFilter,
) -> Result<ReferenceData> {
    let mut builder = ReferenceDataBuilder::new();

    let zip_label = zip_path.display().to_string();
    let locations = read_locations(&mut builder, open(zip_path)?, &zip_label)?;

    let state_label = state_path.display().to_string();
    let states = read_state_names(&mut builder, open(state_path)?, &state_label)?;

    info!(locations, states, "Loaded reference files");
    builder.filter(filter).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS: &str = "\
Zipcode,City,State,LocationType
94401,SAN MATEO,CA,PRIMARY
94401,SAN MATEO,CA,ACCEPTABLE
94401,HILLSDALE,CA,NOT ACCEPTABLE
93277,Visalia,CA,PRIMARY
54301,GREEN BAY,WI,PRIMARY
";

    const STATES: &str = "\
Name\tAliases\tPostal Code
California\tCalif.,Cal\tCA
Wisconsin\tWis.,Wisc.\tWI
West Virginia\t\tWV
";

    #[test]
    fn reads_locations_and_skips_not_acceptable() {
        let mut builder = ReferenceDataBuilder::new();
        let count = read_locations(&mut builder, LOCATIONS.as_bytes(), "zips.csv").unwrap();
        assert_eq!(count, 4);

        read_state_names(&mut builder, STATES.as_bytes(), "states.tsv").unwrap();
        let data = builder.build().unwrap();

        assert_eq!(data.cities_for_zip("94401").unwrap().len(), 2);
        assert!(!data.is_known_city("HILLSDALE"));
        assert_eq!(data.state_for_city("VISALIA"), Some("CA"));
        assert_eq!(data.zip_count(), 3);
    }

    #[test]
    fn reads_state_aliases() {
        let mut builder = ReferenceDataBuilder::new();
        let count = read_state_names(&mut builder, STATES.as_bytes(), "states.tsv").unwrap();
        assert_eq!(count, 3);

        let data = builder.build().unwrap();
        assert_eq!(
            data.aliases_for_state("CA").unwrap(),
            &["CALIF", "CAL", "CALIFORNIA", "CA"]
        );
        assert_eq!(data.aliases_for_state("WV").unwrap(), &["WEST VIRGINIA", "WV"]);
        assert_eq!(data.state_for_alias("WISC"), Some("WI"));
    }

    #[test]
    fn missing_column_is_reported() {
        let mut builder = ReferenceDataBuilder::new();
        let err = read_locations(&mut builder, "Zipcode,City,State\n".as_bytes(), "zips.csv")
            .unwrap_err();
        assert!(matches!(
            err,
            AddrParseError::MissingColumn { column: "LocationType", .. }
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_reference_data(
            Path::new("/nonexistent/zips.csv"),
            Path::new("/nonexistent/states.tsv"),
            ReferenceFilter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AddrParseError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/zips.csv"));
    }
}
