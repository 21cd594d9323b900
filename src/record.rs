//! Value types shared by the parser, analyzer, and output stages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Timestamp layout used by the sensor: ISO-8601 date-time at second
/// precision, no timezone offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Placeholder timestamp reported when no contiguous 90-minute window
/// exists in the data.
pub const NO_WINDOW_TIMESTAMP: &str = "N/A";

/// A single traffic observation: the cars counted over one interval.
///
/// Field order matters: ordering derives from `timestamp` first, and the
/// fixed ISO-8601 layout makes lexicographic order chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TrafficRecord {
    pub timestamp: String,
    pub car_count: u64,
    pub duration_mins: u32,
}

impl TrafficRecord {
    /// A half-hour sample as read from the input file.
    pub fn half_hour(timestamp: impl Into<String>, car_count: u64) -> Self {
        TrafficRecord {
            timestamp: timestamp.into(),
            car_count,
            duration_mins: 30,
        }
    }

    /// A derived record covering three contiguous half-hour samples.
    pub fn ninety_min_window(timestamp: impl Into<String>, car_count: u64) -> Self {
        TrafficRecord {
            timestamp: timestamp.into(),
            car_count,
            duration_mins: 90,
        }
    }

    /// The placeholder returned when the store holds no contiguous
    /// 90-minute window at all.
    pub fn no_window() -> Self {
        Self::ninety_min_window(NO_WINDOW_TIMESTAMP, 0)
    }
}

/// Snapshot of the four statistics computed over one sample store.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub total_traffic: u64,
    pub daily_traffic: BTreeMap<NaiveDate, u64>,
    pub top_half_hours: Vec<TrafficRecord>,
    pub least_ninety_mins_traffic: TrafficRecord,
}
