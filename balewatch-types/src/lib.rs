//! # balewatch-types
//!
//! Core record schema for baler fleet telemetry. This crate defines the
//! universal shapes exchanged between ingestion layers (CSV/JSON uploads,
//! gateway payloads) and the balewatch analytics engine.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies beyond chrono**: the schema works without
//!   any serialization framework
//! - **Optional serialization**: enable the `serde` feature as needed
//! - **Source agnostic**: rows are plain header-named field mappings, so any
//!   upstream parser (CSV, JSON, a gateway) can produce them
//! - **Versioned schema**: reports embed version info for forward
//!   compatibility
//!
//! ## Features
//!
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use balewatch_types::{FieldValue, RawCycleRow, TelemetryRecord};
//!
//! let mut row = RawCycleRow::new();
//! row.insert("device_id".into(), FieldValue::Text("BALER-01".into()));
//! row.insert("cycle_started_at".into(), FieldValue::Text("2024-03-04T09:30:00Z".into()));
//! row.insert("cycle_duration_ms".into(), FieldValue::Number(3_600_000.0));
//!
//! let record = TelemetryRecord::from_row(&row).expect("valid timestamp");
//! assert_eq!(record.device_id, "BALER-01");
//! assert_eq!(record.runtime_hours, 1.0);
//! ```
//!
//! ## Schema Version
//!
//! The current schema version is **1**. The version is included in exported
//! reports to allow consumers to handle format evolution gracefully.

mod field;
mod record;
mod selector;

pub use field::*;
pub use record::*;
pub use selector::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the record or report
/// shapes. Consumers should check this version and handle older formats
/// appropriately.
pub const SCHEMA_VERSION: u32 = 1;
