//! Output formatting and persistence for traffic analysis results.
//!
//! Supports the plain-text report, JSON serialization, and CSV append.

use anyhow::Result;
use tracing::debug;

use crate::record::AnalysisResult;
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;

/// Renders the four-section plain-text report.
///
/// Sections appear in a fixed order: total, daily totals (ascending date),
/// busiest half hours (descending count), quietest 90-minute window.
pub fn render_report(result: &AnalysisResult) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "The number of cars seen in total: {}",
        result.total_traffic
    ));

    lines.push(String::new());
    lines.push("Daily traffic...".to_string());
    lines.push("Date       Number of cars seen".to_string());
    lines.push("-------------------------------".to_string());
    for (date, cars) in &result.daily_traffic {
        lines.push(format!("{date}\t{cars}"));
    }

    lines.push(String::new());
    lines.push(format!(
        "Top {} half hours with highest traffic...",
        result.top_half_hours.len()
    ));
    lines.push("Timestamp           Number of cars seen".to_string());
    lines.push("---------------------------------------".to_string());
    for record in &result.top_half_hours {
        lines.push(format!("{} {}", record.timestamp, record.car_count));
    }

    lines.push(String::new());
    lines.push(format!(
        "Timestamp with least number of cars seen in next 90 minutes: {}",
        result.least_ninety_mins_traffic.timestamp
    ));

    lines.join("\n")
}

/// Prints the analysis result as pretty JSON to stdout.
pub fn print_json(result: &AnalysisResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

/// One exported row of the daily totals table.
#[derive(Serialize)]
struct DailyTrafficRow {
    date: NaiveDate,
    cars: u64,
}

/// Appends the daily totals as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_daily_csv(path: &str, result: &AnalysisResult) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending daily totals as CSV");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for (&date, &cars) in &result.daily_traffic {
        writer.serialize(DailyTrafficRow { date, cars })?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TrafficAnalyzer;
    use crate::record::TrafficRecord;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_result() -> AnalysisResult {
        let analyzer = TrafficAnalyzer::new(vec![
            TrafficRecord::half_hour("2021-12-01T05:00:00", 5),
            TrafficRecord::half_hour("2021-12-01T05:30:00", 12),
            TrafficRecord::half_hour("2021-12-01T06:00:00", 14),
            TrafficRecord::half_hour("2021-12-08T18:00:00", 33),
        ]);
        analyzer.analyze(3)
    }

    #[test]
    fn test_report_sections_in_order() {
        let report = render_report(&sample_result());

        let total_at = report.find("The number of cars seen in total: 64").unwrap();
        let daily_at = report.find("Daily traffic...").unwrap();
        let top_at = report
            .find("Top 3 half hours with highest traffic...")
            .unwrap();
        let least_at = report
            .find("Timestamp with least number of cars seen in next 90 minutes:")
            .unwrap();

        assert!(total_at < daily_at);
        assert!(daily_at < top_at);
        assert!(top_at < least_at);
    }

    #[test]
    fn test_report_daily_rows_ascending() {
        let report = render_report(&sample_result());
        let first = report.find("2021-12-01\t31").unwrap();
        let second = report.find("2021-12-08\t33").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_report_top_rows_descending() {
        let report = render_report(&sample_result());
        assert!(report.contains("2021-12-08T18:00:00 33"));
        let busiest = report.find("2021-12-08T18:00:00 33").unwrap();
        let next = report.find("2021-12-01T06:00:00 14").unwrap();
        assert!(busiest < next);
    }

    #[test]
    fn test_report_names_quietest_window() {
        let report = render_report(&sample_result());
        assert!(report.contains(
            "Timestamp with least number of cars seen in next 90 minutes: 2021-12-01T05:00:00"
        ));
    }

    #[test]
    fn test_report_placeholder_for_missing_window() {
        let analyzer = TrafficAnalyzer::new(Vec::new());
        let report = render_report(&analyzer.analyze(3));
        assert!(report.contains(
            "Timestamp with least number of cars seen in next 90 minutes: N/A"
        ));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_result()).unwrap();
    }

    #[test]
    fn test_append_daily_csv_creates_file() {
        let path = temp_path("traffic_counter_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_daily_csv(&path, &sample_result()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("2021-12-01,31"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_daily_csv_writes_header_once() {
        let path = temp_path("traffic_counter_test_header.csv");
        let _ = fs::remove_file(&path);

        append_daily_csv(&path, &sample_result()).unwrap();
        append_daily_csv(&path, &sample_result()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("date")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_daily_csv_row_count() {
        let path = temp_path("traffic_counter_test_rows.csv");
        let _ = fs::remove_file(&path);

        append_daily_csv(&path, &sample_result()).unwrap();
        append_daily_csv(&path, &sample_result()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 days per append = 5 lines
        assert_eq!(content.lines().count(), 5);

        fs::remove_file(&path).unwrap();
    }
}
