//! Operational analysis: utilization heatmap, idle/active split, daily
//! performance trend.

use balewatch_types::{TelemetryRecord, TimeWindow};
use serde::{Deserialize, Serialize};

use crate::data::config::AnalyticsConfig;
use crate::data::group::{date_label, group_by_device, mean_by, trailing_daily_groups};

/// One cell of the 7x24 utilization grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Day of week, 0 = Sunday.
    pub day: u32,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Runtime hours accumulated in this bucket.
    pub value: f64,
    /// `value` relative to the busiest cell, 0-100.
    pub intensity: f64,
}

/// Idle/active split for one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineUsage {
    pub device_id: String,
    /// Runtime over the filtered set, hours.
    pub active_hours: f64,
    /// Window hours not spent running, floored at 0.
    pub idle_hours: f64,
    /// Active share of the window, percent.
    pub utilization_pct: f64,
}

/// Per-date performance figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPerformance {
    /// `month/day` label.
    pub date: String,
    pub cycles: usize,
    pub runtime_hours: f64,
    pub energy_kwh: f64,
    pub bales: f64,
    /// Mean per-record share of a 24-hour day, percent.
    pub avg_utilization_pct: f64,
}

/// Operational summary over a filtered record set.
///
/// All lists are empty for an empty input set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationalSummary {
    /// Day-major 7x24 grid (day 0 hours 0-23, then day 1, ...).
    pub heatmap: Vec<HeatmapCell>,
    /// Busiest machines first, at most `usage_slice` entries.
    pub usage: Vec<MachineUsage>,
    pub daily: Vec<DailyPerformance>,
}

impl OperationalSummary {
    pub fn compute(
        records: &[TelemetryRecord],
        window: TimeWindow,
        config: &AnalyticsConfig,
    ) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        Self {
            heatmap: heatmap(records),
            usage: usage_split(records, window, config),
            daily: daily_trend(records, config),
        }
    }
}

fn heatmap(records: &[TelemetryRecord]) -> Vec<HeatmapCell> {
    let mut grid = [[0.0f64; 24]; 7];
    for record in records {
        let day = record.day_of_week.min(6) as usize;
        let hour = record.hour_of_day.min(23) as usize;
        grid[day][hour] += record.runtime_hours;
    }

    let max_value = grid
        .iter()
        .flatten()
        .copied()
        .fold(0.0f64, f64::max);

    let mut cells = Vec::with_capacity(7 * 24);
    for (day, hours) in grid.iter().enumerate() {
        for (hour, &value) in hours.iter().enumerate() {
            cells.push(HeatmapCell {
                day: day as u32,
                hour: hour as u32,
                value,
                intensity: if max_value > 0.0 {
                    value / max_value * 100.0
                } else {
                    0.0
                },
            });
        }
    }
    cells
}

fn usage_split(
    records: &[TelemetryRecord],
    window: TimeWindow,
    config: &AnalyticsConfig,
) -> Vec<MachineUsage> {
    // The unbounded window falls back to a 7-day denominator; an infinite
    // availability figure is useless in a split.
    let window_hours = window.span_days() * 24.0;

    let mut usage: Vec<MachineUsage> = group_by_device(records)
        .into_iter()
        .map(|(device, group)| {
            let active_hours: f64 = group.iter().map(|r| r.runtime_hours).sum();
            MachineUsage {
                device_id: device.to_string(),
                active_hours,
                idle_hours: (window_hours - active_hours).max(0.0),
                utilization_pct: active_hours / window_hours * 100.0,
            }
        })
        .collect();

    usage.sort_by(|a, b| {
        b.active_hours
            .partial_cmp(&a.active_hours)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    usage.truncate(config.usage_slice);
    usage
}

fn daily_trend(records: &[TelemetryRecord], config: &AnalyticsConfig) -> Vec<DailyPerformance> {
    trailing_daily_groups(records, config.trend_days)
        .into_iter()
        .map(|(date, group)| DailyPerformance {
            date: date_label(date),
            cycles: group.len(),
            runtime_hours: group.iter().map(|r| r.runtime_hours).sum(),
            energy_kwh: group.iter().map(|r| r.energy_kwh).sum(),
            bales: group.iter().map(|r| r.bale_increment).sum(),
            avg_utilization_pct: mean_by(&group, |r| r.runtime_hours / 24.0 * 100.0),
        })
        .collect()
}
