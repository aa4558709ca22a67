//! Maintenance planning: lifetime extrapolation, MTBF/MTTR, EOL flagging.

use balewatch_types::TelemetryRecord;
use serde::{Deserialize, Serialize};

use crate::data::config::AnalyticsConfig;
use crate::data::group::{group_by_device, mean_by};

/// Wear estimate for one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineWear {
    pub device_id: String,
    /// Observed cycles extrapolated to a yearly total (the filtered set is
    /// treated as one week's worth of cycles).
    pub lifetime_cycles: f64,
    /// Percentage of the lifetime threshold still ahead, floored at 0.
    pub remaining_life_pct: f64,
    /// Runtime hours per error; equals raw runtime for error-free machines.
    pub mtbf_hours: f64,
    /// Heuristic repair time: the configured constant when any error
    /// occurred, otherwise 0. Not a measured figure.
    pub mttr_hours: f64,
    /// Low remaining life or a high mean anomaly score.
    pub near_eol: bool,
}

/// Fleet maintenance outlook.
///
/// Computed as `None` for an empty set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceOutlook {
    pub avg_mtbf_hours: f64,
    pub avg_mttr_hours: f64,
    pub avg_remaining_life_pct: f64,
    /// Near-EOL machines, worst remaining life first.
    pub near_eol: Vec<MachineWear>,
    pub total_machines: usize,
}

impl MaintenanceOutlook {
    pub fn compute(records: &[TelemetryRecord], config: &AnalyticsConfig) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut machines: Vec<MachineWear> = group_by_device(records)
            .into_iter()
            .map(|(device, group)| {
                let lifetime_cycles = group.len() as f64 * config.annualization_weeks;
                let remaining_life_pct = ((config.eol_threshold_cycles - lifetime_cycles)
                    / config.eol_threshold_cycles
                    * 100.0)
                    .max(0.0);

                let runtime_hours: f64 = group.iter().map(|r| r.runtime_hours).sum();
                let errors = group.iter().filter(|r| r.has_error()).count();
                let mtbf_hours = if errors > 0 {
                    runtime_hours / errors as f64
                } else {
                    runtime_hours
                };
                let mttr_hours = if errors > 0 {
                    config.assumed_mttr_hours
                } else {
                    0.0
                };

                let mean_score = mean_by(&group, |r| r.anomaly_score);
                MachineWear {
                    device_id: device.to_string(),
                    lifetime_cycles,
                    remaining_life_pct,
                    mtbf_hours,
                    mttr_hours,
                    near_eol: remaining_life_pct < config.near_eol_cutoff_pct
                        || mean_score > config.anomaly_mean_limit,
                }
            })
            .collect();

        machines.sort_by(|a, b| {
            a.remaining_life_pct
                .partial_cmp(&b.remaining_life_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_machines = machines.len();
        let n = total_machines as f64;
        let avg_mtbf_hours = machines.iter().map(|m| m.mtbf_hours).sum::<f64>() / n;
        let avg_mttr_hours = machines.iter().map(|m| m.mttr_hours).sum::<f64>() / n;
        let avg_remaining_life_pct =
            machines.iter().map(|m| m.remaining_life_pct).sum::<f64>() / n;

        let near_eol = machines
            .into_iter()
            .filter(|m| m.near_eol)
            .take(config.ranking_size)
            .collect();

        Some(Self {
            avg_mtbf_hours,
            avg_mttr_hours,
            avg_remaining_life_pct,
            near_eol,
            total_machines,
        })
    }
}
