//! Aggregation engine over an in-memory traffic sample store.
//!
//! The store is built once from parsed file lines and never mutated; every
//! statistic is recomputed from it on demand.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::record::{AnalysisResult, TIMESTAMP_FORMAT, TrafficRecord};

/// Holds the ordered sample store and computes the four traffic statistics.
///
/// Records keep their file order, which is assumed chronological; the
/// analyzer never re-sorts the store itself.
pub struct TrafficAnalyzer {
    records: Vec<TrafficRecord>,
}

impl TrafficAnalyzer {
    pub fn new(records: Vec<TrafficRecord>) -> Self {
        TrafficAnalyzer { records }
    }

    pub fn records(&self) -> &[TrafficRecord] {
        &self.records
    }

    /// Total cars seen across all samples.
    pub fn total_traffic(&self) -> u64 {
        self.records.iter().map(|r| r.car_count).sum()
    }

    /// Cars seen per calendar day, keyed by date in ascending order.
    ///
    /// Days without samples do not appear. The ordered map makes the key
    /// order deterministic regardless of insertion order.
    pub fn daily_traffic(&self) -> BTreeMap<NaiveDate, u64> {
        let mut daily = BTreeMap::new();
        for record in &self.records {
            if let Some(ts) = parse_timestamp(&record.timestamp) {
                *daily.entry(ts.date()).or_insert(0) += record.car_count;
            }
        }
        daily
    }

    /// The `n` samples with the highest counts, busiest first.
    ///
    /// Sorts a copy; the store itself keeps file order. `sort_by` is
    /// stable, so samples with equal counts keep their relative file order.
    pub fn top_n_half_hours(&self, n: usize) -> Vec<TrafficRecord> {
        let mut by_count = self.records.clone();
        by_count.sort_by(|a, b| b.car_count.cmp(&a.car_count));
        by_count.truncate(n);
        by_count
    }

    /// Every contiguous 90-minute span, as derived records in store order.
    ///
    /// A span starting at index `i` counts only if the samples at `i + 1`
    /// and `i + 2` sit exactly 30 and 60 minutes after sample `i`. Adjacency
    /// is positional: a matching timestamp elsewhere in the store does not
    /// bridge a gap.
    pub fn contiguous_ninety_min_windows(&self) -> Vec<TrafficRecord> {
        (0..self.records.len())
            .filter(|&i| self.has_contiguous_successors(i))
            .map(|i| {
                let car_count = self.records[i..i + 3].iter().map(|r| r.car_count).sum();
                TrafficRecord::ninety_min_window(self.records[i].timestamp.clone(), car_count)
            })
            .collect()
    }

    /// The contiguous 90-minute span with the fewest cars.
    ///
    /// Ties resolve to the earliest span. With no contiguous span at all
    /// the `N/A` placeholder record is returned; this is not an error.
    pub fn least_cars_in_ninety_mins(&self) -> TrafficRecord {
        // min_by_key keeps the first entry on ties
        self.contiguous_ninety_min_windows()
            .into_iter()
            .min_by_key(|w| w.car_count)
            .unwrap_or_else(TrafficRecord::no_window)
    }

    /// Computes all four statistics in one snapshot.
    pub fn analyze(&self, top_n: usize) -> AnalysisResult {
        AnalysisResult {
            total_traffic: self.total_traffic(),
            daily_traffic: self.daily_traffic(),
            top_half_hours: self.top_n_half_hours(top_n),
            least_ninety_mins_traffic: self.least_cars_in_ninety_mins(),
        }
    }

    fn has_contiguous_successors(&self, i: usize) -> bool {
        let Some(span) = self.records.get(i..i + 3) else {
            return false;
        };
        let Some(base) = parse_timestamp(&span[0].timestamp) else {
            return false;
        };
        // Calendar arithmetic, so day/month/year rollover is handled.
        parse_timestamp(&span[1].timestamp) == Some(base + Duration::minutes(30))
            && parse_timestamp(&span[2].timestamp) == Some(base + Duration::minutes(60))
    }
}

/// Timestamps are validated at parse time; records built by hand with an
/// unparsable timestamp are treated as dateless and non-adjacent rather
/// than panicking.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}
