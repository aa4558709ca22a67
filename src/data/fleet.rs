//! Fleet-wide overview statistics.

use balewatch_types::TelemetryRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::data::filter::anchor_of;

/// Whole-fleet summary over a filtered record set.
///
/// Computed as `None` for an empty set: "no data" is distinct from data
/// that shows zero activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetOverview {
    /// Total hours of machine runtime.
    pub total_runtime_hours: f64,
    /// Fleet utilization over the observed window, percent, capped at 100.
    ///
    /// Overlapping or duplicated cycles can push the raw ratio above 100;
    /// the cap keeps the figure a meaningful percentage.
    pub utilization_rate_pct: f64,
    /// Completed cycles in the set.
    pub total_cycles: usize,
    /// Cycles with an e-stop or overload.
    pub error_count: usize,
    /// Distinct machines reporting data.
    pub unique_devices: usize,
    /// Workload balance indicator: cycles per machine.
    pub avg_cycles_per_machine: f64,
    /// Total active energy, kWh.
    pub total_energy_kwh: f64,
    /// Total bales produced.
    pub total_bales: f64,
}

impl FleetOverview {
    /// Compute the overview, or `None` when the set is empty.
    pub fn compute(records: &[TelemetryRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let total_runtime_hours: f64 = records.iter().map(|r| r.runtime_hours).sum();
        let total_cycles = records.len();

        let devices: BTreeSet<&str> =
            records.iter().map(|r| r.device_id.as_str()).collect();
        let unique_devices = devices.len();

        let newest = anchor_of(records)?;
        let earliest = records.iter().map(|r| r.started_at).min()?;
        // Floor the window at one hour so a single-instant set does not
        // blow up the ratio.
        let window_hours =
            ((newest - earliest).num_milliseconds() as f64 / 3_600_000.0).max(1.0);

        let utilization_rate_pct =
            (total_runtime_hours / (unique_devices as f64 * window_hours) * 100.0).min(100.0);

        Some(Self {
            total_runtime_hours,
            utilization_rate_pct,
            total_cycles,
            error_count: records.iter().filter(|r| r.has_error()).count(),
            unique_devices,
            avg_cycles_per_machine: total_cycles as f64 / unique_devices as f64,
            total_energy_kwh: records.iter().map(|r| r.energy_kwh).sum(),
            total_bales: records.iter().map(|r| r.bale_increment).sum(),
        })
    }
}
