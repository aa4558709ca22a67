// Binary includes library modules - some public API items are only for
// library consumers
#![allow(unused)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

mod app;
mod data;
mod report;
mod source;

use app::Analyzer;
use balewatch_types::{DeviceSelector, TimeWindow};
use data::AnalyticsConfig;
use source::{CsvSource, RowSource};

#[derive(Parser, Debug)]
#[command(name = "balewatch")]
#[command(about = "Fleet telemetry analytics for baling and compaction machinery")]
struct Args {
    /// Path to the telemetry CSV file
    #[arg(short, long)]
    file: PathBuf,

    /// Device to analyze ("all" for the whole fleet)
    #[arg(short, long, default_value = "all")]
    device: String,

    /// Rolling time window: 24h, 7d, 30d, or all
    #[arg(short, long, default_value = "7d")]
    window: String,

    /// Optional analytics config file (thresholds, slice sizes)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Pretty-print the report JSON
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "balewatch=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;

    let mut source = CsvSource::new(&args.file);
    let rows = source
        .fetch()
        .with_context(|| format!("reading {}", source.description()))?;

    let mut analyzer = Analyzer::new(config);
    let dropped = analyzer.ingest_rows(&rows);
    if dropped > 0 {
        tracing::warn!(
            dropped,
            total = rows.len(),
            "rows dropped for unparseable cycle_started_at"
        );
    }

    analyzer.set_device(DeviceSelector::parse(&args.device));
    analyzer.set_window(TimeWindow::parse(&args.window));

    tracing::info!(
        devices = analyzer.devices().len(),
        records = analyzer.working_set().len(),
        filtered = analyzer.data().len(),
        "telemetry loaded"
    );

    let report = analyzer.report();
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match args.export {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Load the analytics config, layering an optional file under
/// `BALEWATCH_*` environment overrides. Missing file and variables leave
/// the published defaults in place.
fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let settings = builder
        .add_source(config::Environment::with_prefix("BALEWATCH").try_parsing(true))
        .build()
        .context("loading analytics config")?;

    settings
        .try_deserialize()
        .context("invalid analytics config")
}
