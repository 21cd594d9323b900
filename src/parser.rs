//! Line parser for machine-generated traffic sensor files.

use chrono::NaiveDateTime;

use crate::record::{TIMESTAMP_FORMAT, TrafficRecord};

/// Errors produced while constructing the sample store.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// A line did not split into exactly `<timestamp> <count>`.
    #[error("line {line}: expected \"<timestamp> <count>\", found {fields} fields")]
    FieldCount { line: usize, fields: usize },
    /// The count token was not a non-negative integer.
    #[error("line {line}: invalid car count {value:?}: {source}")]
    CarCount {
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    /// The timestamp token did not match the sensor's ISO-8601 layout.
    #[error("line {line}: invalid timestamp {value:?}: {source}")]
    Timestamp {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parses the full contents of a traffic data file into sample records.
///
/// One record per line, `<timestamp> <count>` separated by whitespace,
/// kept in file order. Empty input yields an empty store.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the first malformed line. Any bad line
/// fails the whole construction; no partial store is ever returned.
pub fn parse_records(input: &str) -> Result<Vec<TrafficRecord>, ParseError> {
    input
        .lines()
        .enumerate()
        .map(|(idx, line)| parse_line(idx + 1, line))
        .collect()
}

fn parse_line(line_no: usize, line: &str) -> Result<TrafficRecord, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [timestamp, raw_count] = tokens[..] else {
        return Err(ParseError::FieldCount {
            line: line_no,
            fields: tokens.len(),
        });
    };

    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).map_err(|source| {
        ParseError::Timestamp {
            line: line_no,
            value: timestamp.to_string(),
            source,
        }
    })?;

    let car_count = raw_count.parse().map_err(|source| ParseError::CarCount {
        line: line_no,
        value: raw_count.to_string(),
        source,
    })?;

    Ok(TrafficRecord::half_hour(timestamp, car_count))
}
