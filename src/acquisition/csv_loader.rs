//! CSV loader for `Timestamp, Pressure, Temperature, DV` sensor files
//!
//! Columns are matched by name (case-insensitive, trimmed) so column order and
//! extra columns do not matter. A row is kept only when all four fields parse
//! to finite values; everything else is counted and dropped.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::{Dataset, Reading};

/// Required header names, in `Reading` field order.
const REQUIRED_COLUMNS: [&str; 4] = ["Timestamp", "Pressure", "Temperature", "DV"];

/// Naive layouts tried after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open data file {}: {}", .0.display(), .1)]
    Open(PathBuf, #[source] csv::Error),

    #[error("Failed to read CSV header from {source_name}: {error}")]
    Header {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    #[error("CSV {source_name} is missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("I/O error while reading {source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: csv::Error,
    },
}

// ============================================================================
// Public entry-points
// ============================================================================

/// Load a sensor CSV from disk.
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path)
        .map_err(|e| LoadError::Open(path.to_path_buf(), csv::Error::from(e)))?;
    let dataset = load_from_reader(file, &path.display().to_string())?;
    info!(
        path = %path.display(),
        count = dataset.len(),
        dropped = dataset.dropped_rows(),
        "Loaded sensor readings from CSV"
    );
    Ok(dataset)
}

/// Load sensor readings from any reader. `source_name` only labels errors and logs.
pub fn load_from_reader<R: Read>(reader: R, source_name: &str) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|error| LoadError::Header {
        source_name: source_name.to_string(),
        error,
    })?;
    let columns = resolve_columns(headers, source_name)?;

    let mut readings = Vec::new();
    let mut dropped = 0usize;

    for (idx, record) in reader.records().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let record = match record {
            Ok(r) => r,
            Err(error) if error.is_io_error() => {
                return Err(LoadError::Read {
                    source_name: source_name.to_string(),
                    error,
                });
            }
            Err(e) => {
                debug!(line, error = %e, "Dropping malformed CSV row");
                dropped += 1;
                continue;
            }
        };

        match parse_record(&record, &columns) {
            Some(reading) => readings.push(reading),
            None => {
                debug!(line, "Dropping CSV row with missing or unparseable field");
                dropped += 1;
            }
        }
    }

    Ok(Dataset::new(readings).with_dropped_rows(dropped))
}

/// Parse a timestamp in any of the accepted layouts.
///
/// RFC 3339 values with an offset are converted to UTC and stored naive.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ============================================================================
// Helpers
// ============================================================================

/// Column indices for `REQUIRED_COLUMNS`.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    timestamp: usize,
    pressure: usize,
    temperature: usize,
    dv: usize,
}

fn resolve_columns(headers: &csv::StringRecord, source_name: &str) -> Result<ColumnMap, LoadError> {
    let find = |column: &'static str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| LoadError::MissingColumn {
                source_name: source_name.to_string(),
                column,
            })
    };

    let [timestamp, pressure, temperature, dv] = REQUIRED_COLUMNS;
    Ok(ColumnMap {
        timestamp: find(timestamp)?,
        pressure: find(pressure)?,
        temperature: find(temperature)?,
        dv: find(dv)?,
    })
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnMap) -> Option<Reading> {
    let timestamp = parse_timestamp(record.get(columns.timestamp)?)?;
    let pressure = parse_number(record.get(columns.pressure)?)?;
    let temperature = parse_number(record.get(columns.temperature)?)?;
    let dv = parse_number(record.get(columns.dv)?)?;
    Some(Reading::new(timestamp, pressure, temperature, dv))
}

/// Empty, non-numeric, NaN and infinite values all count as null.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
