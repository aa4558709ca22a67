//! # balewatch
//!
//! A batch analytics engine and CLI for per-cycle telemetry from baling
//! and compaction machinery.
//!
//! This crate normalizes raw telemetry rows into canonical records,
//! filters them by device and rolling time window, and computes the
//! fleet-wide and per-machine aggregates used for operational, safety, and
//! maintenance decision support.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐                 │
//! │  │   app   │───▶│   data   │───▶│  report  │──▶ JSON/display │
//! │  │ (state) │    │ (engine) │    │ (output) │                 │
//! │  └────┬────┘    └──────────┘    └──────────┘                 │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── CsvSource | MemorySource | parse_rows_json   │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Session state - the working set, the filtered view, and
//!   the current selectors
//! - **[`source`]**: Ingestion boundary ([`RowSource`] trait) with CSV and
//!   in-memory implementations
//! - **[`data`]**: The engine - normalization, filtering, and the six
//!   aggregate families
//! - **[`report`]**: The serializable [`FleetReport`] handed to display
//!   layers
//!
//! The engine is a pure, synchronous computation over an in-memory batch:
//! given the same rows and selectors it produces the same report.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Analyze a telemetry CSV over the trailing week
//! balewatch --file fleet_telemetry.csv
//!
//! # One machine over the trailing 24 hours, pretty-printed
//! balewatch --file fleet_telemetry.csv --device BALER-07 --window 24h --pretty
//! ```
//!
//! ### As a library
//!
//! ```
//! use balewatch::{Analyzer, MemorySource, RowSource};
//! use balewatch_types::{FieldValue, RawCycleRow, TimeWindow};
//!
//! let mut row = RawCycleRow::new();
//! row.insert("device_id".into(), FieldValue::Text("BALER-01".into()));
//! row.insert("cycle_started_at".into(), FieldValue::Text("2024-03-04T09:30:00Z".into()));
//! row.insert("cycle_duration_ms".into(), FieldValue::Number(3_600_000.0));
//!
//! let mut source = MemorySource::new(vec![row], "example");
//! let rows = source.fetch().expect("non-empty batch");
//!
//! let mut analyzer = Analyzer::default();
//! analyzer.ingest_rows(&rows);
//! analyzer.set_window(TimeWindow::Day);
//!
//! let report = analyzer.report();
//! assert_eq!(report.fleet.unwrap().total_cycles, 1);
//! ```

pub mod app;
pub mod data;
pub mod report;
pub mod source;

// Re-export main types for convenience
pub use app::Analyzer;
pub use data::{
    AnalyticsConfig, AnomalySummary, FleetOverview, HealthSummary, MachineRankings,
    MachineStanding, MachineStatus, MachineWear, MaintenanceOutlook, NormalizedBatch,
    OperationalSummary, SafetySummary,
};
pub use report::FleetReport;
pub use source::{CsvSource, MemorySource, RowSource, SourceError};
