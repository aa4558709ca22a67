//! Per-machine standings and top/bottom ranking.

use balewatch_types::TelemetryRecord;
use serde::{Deserialize, Serialize};

use crate::data::config::AnalyticsConfig;
use crate::data::group::group_by_device;

/// Hours in the fixed one-week utilization denominator.
///
/// Standings always rate utilization against a 7-day week regardless of the
/// selected time window. This is inconsistent with the window-relative
/// fleet utilization and is kept for output compatibility; see
/// `FleetOverview::utilization_rate_pct` for the window-relative figure.
const FIXED_WEEK_HOURS: f64 = 7.0 * 24.0;

/// Health status of one machine over the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineStatus {
    Healthy,
    Warning,
}

impl MachineStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            MachineStatus::Healthy => "OK",
            MachineStatus::Warning => "WARN",
        }
    }
}

/// Aggregate standing of one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineStanding {
    pub device_id: String,
    /// Total runtime over the filtered set, hours.
    pub runtime_hours: f64,
    /// Cycle count.
    pub cycles: usize,
    /// Total energy, kWh.
    pub energy_kwh: f64,
    /// Cycles with an e-stop or overload.
    pub errors: usize,
    /// Runtime hours per error; equals raw runtime for error-free machines.
    ///
    /// A simplification, not a true MTBF (the maintenance module computes
    /// MTBF proper).
    pub efficiency: f64,
    /// Runtime against the fixed one-week denominator, percent.
    pub utilization_pct: f64,
    pub status: MachineStatus,
}

/// Fleet ranking: best and worst machines by runtime.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MachineRankings {
    /// Highest-runtime machines, descending.
    pub top: Vec<MachineStanding>,
    /// Lowest-runtime machines, worst first (ascending runtime).
    pub bottom: Vec<MachineStanding>,
}

impl MachineRankings {
    /// Compute standings and slice the top/bottom lists.
    ///
    /// With fewer than `2 * ranking_size` machines the two lists overlap;
    /// this is accepted rather than deduplicated.
    pub fn compute(records: &[TelemetryRecord], config: &AnalyticsConfig) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let mut standings: Vec<MachineStanding> = group_by_device(records)
            .into_iter()
            .map(|(device, group)| {
                let runtime_hours: f64 = group.iter().map(|r| r.runtime_hours).sum();
                let errors = group.iter().filter(|r| r.has_error()).count();
                let efficiency = if errors > 0 {
                    runtime_hours / errors as f64
                } else {
                    runtime_hours
                };

                MachineStanding {
                    device_id: device.to_string(),
                    runtime_hours,
                    cycles: group.len(),
                    energy_kwh: group.iter().map(|r| r.energy_kwh).sum(),
                    errors,
                    efficiency,
                    utilization_pct: runtime_hours / FIXED_WEEK_HOURS * 100.0,
                    status: if errors > 0 {
                        MachineStatus::Warning
                    } else {
                        MachineStatus::Healthy
                    },
                }
            })
            .collect();

        standings.sort_by(|a, b| {
            b.runtime_hours
                .partial_cmp(&a.runtime_hours)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top = standings.iter().take(config.ranking_size).cloned().collect();
        let bottom = standings
            .iter()
            .rev()
            .take(config.ranking_size)
            .cloned()
            .collect();

        Self { top, bottom }
    }
}
