//! CSV import for indicator datasets and individual health records

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::IndicatorRecord;
use crate::monitor::HealthValues;

/// Column names in the chronic disease indicator export
const YEAR_COLUMN: &str = "YearStart";
const LOCATION_COLUMN: &str = "LocationDesc";
const TOPIC_COLUMN: &str = "Topic";
const VALUE_COLUMN: &str = "DataValue";

/// Parsed indicator rows plus how many were discarded
#[derive(Debug, Clone, Default)]
pub struct IndicatorImport {
    pub records: Vec<IndicatorRecord>,
    /// Rows missing a year, location, topic or numeric value
    pub dropped: usize,
}

/// Find a column by header name
fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| clean_header(h) == name)
        .ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))
}

fn clean_header(header: &str) -> &str {
    header.trim().trim_start_matches('\u{feff}')
}

/// Parse a numeric cell, tolerating whitespace and thousands separators
fn parse_value(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse the U.S. Chronic Disease Indicators CSV export
///
/// Columns are located by header name, so extra columns and any column
/// order are accepted. Rows with an empty or non-numeric `DataValue` (or a
/// missing year, location or topic) are dropped and counted.
pub fn parse_indicator_csv<R: Read>(reader: R) -> Result<IndicatorImport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let year_idx = column_index(&headers, YEAR_COLUMN)?;
    let location_idx = column_index(&headers, LOCATION_COLUMN)?;
    let topic_idx = column_index(&headers, TOPIC_COLUMN)?;
    let value_idx = column_index(&headers, VALUE_COLUMN)?;

    let mut import = IndicatorImport::default();

    for result in rdr.records() {
        let record = result?;

        let time = non_empty(record.get(year_idx)).and_then(|s| s.parse::<i32>().ok());
        let entity = non_empty(record.get(location_idx));
        let topic = non_empty(record.get(topic_idx));
        let value = record.get(value_idx).and_then(parse_value);

        match (time, entity, topic, value) {
            (Some(time), Some(entity), Some(topic), Some(value)) => {
                import
                    .records
                    .push(IndicatorRecord::new(time, entity, topic, value));
            }
            _ => import.dropped += 1,
        }
    }

    if import.dropped > 0 {
        warn!(
            dropped = import.dropped,
            kept = import.records.len(),
            "Dropped indicator rows with missing values"
        );
    }
    debug!(records = import.records.len(), "Parsed indicator CSV");

    Ok(import)
}

/// Parse individual health records: one column per topic, one person per row
///
/// Blank or non-numeric cells are left out of that person's values.
pub fn parse_health_csv<R: Read>(reader: R) -> Result<Vec<HealthValues>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| clean_header(h).to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Import("Health record CSV has no header".into()));
    }

    let mut people = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let values: HealthValues = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| !h.is_empty())
            .filter_map(|(h, cell)| parse_value(cell).map(|v| (h.clone(), v)))
            .collect();
        people.push(values);
    }

    Ok(people)
}

/// SHA-256 over the cleaned records, for recognising identical inputs
pub fn fingerprint(records: &[IndicatorRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        hasher.update(record.time.to_be_bytes());
        hasher.update(record.entity.as_bytes());
        hasher.update([0u8]);
        hasher.update(record.topic.as_bytes());
        hasher.update([0u8]);
        hasher.update(record.value.to_be_bytes());
    }
    hex::encode(hasher.finalize())
}
