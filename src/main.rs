//! CLI entry point for the traffic counter tool.
//!
//! Reads a file of half-hour traffic sensor samples and reports the total
//! count, daily totals, busiest half hours, and the quietest contiguous
//! 90-minute window.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use traffic_counter::analyzer::TrafficAnalyzer;
use traffic_counter::output::{append_daily_csv, print_json, render_report};
use traffic_counter::parser::parse_records;
use traffic_counter::record::TrafficRecord;

#[derive(Parser)]
#[command(name = "traffic_counter")]
#[command(about = "Analyzes machine generated traffic sensor data", long_about = None)]
struct Cli {
    /// Filepath of machine generated traffic data
    #[arg(long, default_value = "./data/data.txt")]
    inputfile: String,

    /// How many of the busiest half hours to report
    #[arg(short = 'n', long, default_value_t = 3)]
    top: usize,

    /// Print the analysis as JSON instead of the plain-text report
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Optional CSV file to append the daily totals to
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/traffic_counter.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_counter.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let records = load_records(&cli.inputfile)?;
    let analyzer = TrafficAnalyzer::new(records);
    let result = analyzer.analyze(cli.top);

    info!(
        total = result.total_traffic,
        days = result.daily_traffic.len(),
        quietest_window = %result.least_ninety_mins_traffic.timestamp,
        "Analysis complete"
    );

    if let Some(output) = &cli.output {
        append_daily_csv(output, &result)?;
        info!(path = %output, "Daily totals appended");
    }

    if cli.json {
        print_json(&result)?;
    } else {
        println!("{}", render_report(&result));
    }

    Ok(())
}

/// Reads a traffic data file and parses every line into sample records.
#[tracing::instrument(fields(path = %path))]
fn load_records(path: &str) -> Result<Vec<TrafficRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read traffic data file {path:?}"))?;
    let records = parse_records(&contents)
        .with_context(|| format!("malformed traffic data in {path:?}"))?;

    info!(records = records.len(), "Traffic data loaded");
    Ok(records)
}
