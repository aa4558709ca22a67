//! Safety counts, health averages, and anomaly ranking.
//!
//! Three independent sub-computations over the same filtered set. Each
//! returns a zero-valued default for empty input rather than failing.

use balewatch_types::TelemetryRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::config::AnalyticsConfig;
use crate::data::group::{date_label, group_by_device, mean_by, trailing_daily_groups};

/// Safety incident counts with a daily trend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SafetySummary {
    pub e_stop_count: usize,
    pub overload_count: usize,
    /// Door-open plus gate-open events across the set.
    pub door_gate_violations: f64,
    pub valve_issue_count: usize,
    pub daily: Vec<SafetyDaily>,
}

/// Safety counts for one trend date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyDaily {
    /// `month/day` label.
    pub date: String,
    pub e_stops: usize,
    pub overloads: usize,
    pub door_gate: f64,
    pub valve_issues: usize,
}

impl SafetySummary {
    pub fn compute(records: &[TelemetryRecord], config: &AnalyticsConfig) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let daily = trailing_daily_groups(records, config.trend_days)
            .into_iter()
            .map(|(date, group)| SafetyDaily {
                date: date_label(date),
                e_stops: group.iter().filter(|r| r.e_stop).count(),
                overloads: group.iter().filter(|r| r.overload).count(),
                door_gate: group
                    .iter()
                    .map(|r| r.door_open_events + r.gate_open_events)
                    .sum(),
                valve_issues: group.iter().filter(|r| r.valve_issue).count(),
            })
            .collect();

        Self {
            e_stop_count: records.iter().filter(|r| r.e_stop).count(),
            overload_count: records.iter().filter(|r| r.overload).count(),
            door_gate_violations: records
                .iter()
                .map(|r| r.door_open_events + r.gate_open_events)
                .sum(),
            valve_issue_count: records.iter().filter(|r| r.valve_issue).count(),
            daily,
        }
    }
}

/// Fleet health averages with a daily trend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthSummary {
    /// Mean phase-current imbalance, percent.
    pub avg_current_imbalance: f64,
    /// Mean hydraulic pressure overshoot, percent.
    pub avg_pressure_overshoot: f64,
    /// Mean deviation of cycle durations from the median baseline, percent.
    pub cycle_time_drift_pct: f64,
    /// Mean energy per cycle, kWh.
    pub avg_energy_per_cycle: f64,
    pub daily: Vec<HealthDaily>,
}

/// Health means for one trend date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDaily {
    /// `month/day` label.
    pub date: String,
    pub current_imbalance: f64,
    pub pressure_overshoot: f64,
    pub cycle_time_drift: f64,
    pub energy_per_cycle: f64,
}

impl HealthSummary {
    pub fn compute(records: &[TelemetryRecord], config: &AnalyticsConfig) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let baseline = median_cycle_duration(records);
        let drift_of = |r: &TelemetryRecord| (r.cycle_duration_ms - baseline) / baseline * 100.0;

        let all: Vec<&TelemetryRecord> = records.iter().collect();
        let daily = trailing_daily_groups(records, config.trend_days)
            .into_iter()
            .map(|(date, group)| HealthDaily {
                date: date_label(date),
                current_imbalance: mean_by(&group, |r| r.current_imbalance),
                pressure_overshoot: mean_by(&group, |r| r.pressure_overshoot),
                cycle_time_drift: mean_by(&group, drift_of),
                energy_per_cycle: mean_by(&group, |r| r.energy_per_cycle),
            })
            .collect();

        Self {
            avg_current_imbalance: mean_by(&all, |r| r.current_imbalance),
            avg_pressure_overshoot: mean_by(&all, |r| r.pressure_overshoot),
            cycle_time_drift_pct: mean_by(&all, drift_of),
            avg_energy_per_cycle: mean_by(&all, |r| r.energy_per_cycle),
            daily,
        }
    }
}

/// Baseline cycle duration: the element at index `n/2` of the sorted
/// durations. Even-length sets take that exact element, never the average
/// of the middle pair. Defaults to 1 on an empty set.
fn median_cycle_duration(records: &[TelemetryRecord]) -> f64 {
    let mut durations: Vec<f64> = records.iter().map(|r| r.cycle_duration_ms).collect();
    durations.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let baseline = durations.get(durations.len() / 2).copied().unwrap_or(1.0);
    if baseline == 0.0 {
        1.0
    } else {
        baseline
    }
}

/// Anomaly counts and high-risk machine ranking with a daily trend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnomalySummary {
    /// Records with the anomaly flag set.
    pub anomaly_count: usize,
    /// Mean anomaly score across the whole set, scaled to 0-100.
    pub avg_score_pct: f64,
    /// Machines with more than the configured number of anomalous cycles,
    /// most recent anomaly first.
    pub high_risk: Vec<HighRiskMachine>,
    pub daily: Vec<AnomalyDaily>,
}

/// One machine exceeding the high-risk anomaly count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighRiskMachine {
    pub device_id: String,
    pub anomaly_count: usize,
    /// Mean score of the anomalous cycles, scaled to 0-100.
    pub avg_score_pct: f64,
    /// Newest anomalous cycle.
    pub last_anomaly: DateTime<Utc>,
}

/// Anomaly stats for one trend date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDaily {
    /// `month/day` label.
    pub date: String,
    pub anomalies: usize,
    pub avg_score_pct: f64,
}

impl AnomalySummary {
    pub fn compute(records: &[TelemetryRecord], config: &AnalyticsConfig) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let anomalous: Vec<TelemetryRecord> =
            records.iter().filter(|r| r.anomaly).cloned().collect();

        let mut high_risk: Vec<HighRiskMachine> = group_by_device(&anomalous)
            .into_iter()
            .filter(|(_, group)| group.len() > config.high_risk_min_anomalies)
            .map(|(device, group)| HighRiskMachine {
                device_id: device.to_string(),
                anomaly_count: group.len(),
                avg_score_pct: mean_by(&group, |r| r.anomaly_score) * 100.0,
                last_anomaly: group
                    .iter()
                    .map(|r| r.started_at)
                    .max()
                    .expect("high-risk group is non-empty"),
            })
            .collect();
        high_risk.sort_by(|a, b| b.last_anomaly.cmp(&a.last_anomaly));
        high_risk.truncate(config.ranking_size);

        let daily = trailing_daily_groups(records, config.trend_days)
            .into_iter()
            .map(|(date, group)| AnomalyDaily {
                date: date_label(date),
                anomalies: group.iter().filter(|r| r.anomaly).count(),
                avg_score_pct: mean_by(&group, |r| r.anomaly_score) * 100.0,
            })
            .collect();

        let all: Vec<&TelemetryRecord> = records.iter().collect();
        Self {
            anomaly_count: anomalous.len(),
            avg_score_pct: mean_by(&all, |r| r.anomaly_score) * 100.0,
            high_risk,
            daily,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::cycle;

    fn cfg() -> AnalyticsConfig {
        AnalyticsConfig::default()
    }

    #[test]
    fn empty_set_yields_zero_defaults() {
        assert_eq!(SafetySummary::compute(&[], &cfg()), SafetySummary::default());
        assert_eq!(HealthSummary::compute(&[], &cfg()), HealthSummary::default());
        assert_eq!(
            AnomalySummary::compute(&[], &cfg()),
            AnomalySummary::default()
        );
    }

    #[test]
    fn safety_counts_and_event_sums() {
        let mut a = cycle("M1", "2024-03-04T08:00:00Z", 0.0);
        a.e_stop = true;
        a.door_open_events = 2.0;
        let mut b = cycle("M2", "2024-03-04T09:00:00Z", 0.0);
        b.overload = true;
        b.valve_issue = true;
        b.gate_open_events = 1.0;

        let summary = SafetySummary::compute(&[a, b], &cfg());
        assert_eq!(summary.e_stop_count, 1);
        assert_eq!(summary.overload_count, 1);
        assert_eq!(summary.door_gate_violations, 3.0);
        assert_eq!(summary.valve_issue_count, 1);

        assert_eq!(summary.daily.len(), 1);
        assert_eq!(summary.daily[0].date, "3/4");
        assert_eq!(summary.daily[0].e_stops, 1);
        assert_eq!(summary.daily[0].door_gate, 3.0);
    }

    #[test]
    fn median_baseline_takes_index_n_over_2() {
        // Sorted durations [100, 200, 300, 400]: index 2 is 300, not the
        // 250 an averaged median would give.
        let records: Vec<_> = [300.0, 100.0, 400.0, 200.0]
            .iter()
            .map(|&ms| cycle("M1", "2024-03-04T08:00:00Z", ms))
            .collect();
        assert_eq!(median_cycle_duration(&records), 300.0);
    }

    #[test]
    fn cycle_time_drift_against_median_baseline() {
        // Durations [100, 200, 300]; baseline 200. Drifts -50%, 0%, +50%.
        let records: Vec<_> = [100.0, 200.0, 300.0]
            .iter()
            .map(|&ms| cycle("M1", "2024-03-04T08:00:00Z", ms))
            .collect();
        let summary = HealthSummary::compute(&records, &cfg());
        assert!(summary.cycle_time_drift_pct.abs() < 1e-9);
    }

    #[test]
    fn health_means_cover_all_records() {
        let mut a = cycle("M1", "2024-03-04T08:00:00Z", 100.0);
        a.current_imbalance = 10.0;
        a.pressure_overshoot = 20.0;
        a.energy_per_cycle = 2.0;
        let mut b = cycle("M1", "2024-03-04T09:00:00Z", 100.0);
        b.current_imbalance = 30.0;
        b.pressure_overshoot = 40.0;
        b.energy_per_cycle = 4.0;

        let summary = HealthSummary::compute(&[a, b], &cfg());
        assert_eq!(summary.avg_current_imbalance, 20.0);
        assert_eq!(summary.avg_pressure_overshoot, 30.0);
        assert_eq!(summary.avg_energy_per_cycle, 3.0);
    }

    #[test]
    fn high_risk_requires_more_than_three_anomalies() {
        let mut records = Vec::new();
        // M1: exactly 3 anomalous cycles - not high-risk.
        for hour in 8..11 {
            let mut r = cycle("M1", &format!("2024-03-04T{hour:02}:00:00Z"), 0.0);
            r.anomaly = true;
            r.anomaly_score = 0.8;
            records.push(r);
        }
        // M2: 4 anomalous cycles - high-risk.
        for hour in 8..12 {
            let mut r = cycle("M2", &format!("2024-03-05T{hour:02}:00:00Z"), 0.0);
            r.anomaly = true;
            r.anomaly_score = 0.9;
            records.push(r);
        }

        let summary = AnomalySummary::compute(&records, &cfg());
        assert_eq!(summary.anomaly_count, 7);
        assert_eq!(summary.high_risk.len(), 1);

        let risky = &summary.high_risk[0];
        assert_eq!(risky.device_id, "M2");
        assert_eq!(risky.anomaly_count, 4);
        assert!((risky.avg_score_pct - 90.0).abs() < 1e-9);
        assert_eq!(
            risky.last_anomaly,
            "2024-03-05T11:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn high_risk_sorted_by_most_recent_anomaly() {
        let mut records = Vec::new();
        for (device, day) in [("M1", 6), ("M2", 8), ("M3", 7)] {
            for hour in 8..12 {
                let mut r = cycle(device, &format!("2024-03-{day:02}T{hour:02}:00:00Z"), 0.0);
                r.anomaly = true;
                r.anomaly_score = 0.6;
                records.push(r);
            }
        }

        let summary = AnomalySummary::compute(&records, &cfg());
        let order: Vec<&str> = summary
            .high_risk
            .iter()
            .map(|m| m.device_id.as_str())
            .collect();
        assert_eq!(order, ["M2", "M3", "M1"]);
    }

    #[test]
    fn daily_trend_keeps_trailing_seven_discovered_dates() {
        // 10 distinct dates, presented newest-first so discovery order is
        // the reverse of calendar order.
        let mut records = Vec::new();
        for day in (1..=10).rev() {
            let mut r = cycle("M1", &format!("2024-03-{day:02}T08:00:00Z"), 0.0);
            r.e_stop = day % 2 == 0;
            records.push(r);
        }

        let summary = SafetySummary::compute(&records, &cfg());
        let dates: Vec<&str> = summary.daily.iter().map(|d| d.date.as_str()).collect();
        // Last 7 groups in discovery order: days 7 down to 1.
        assert_eq!(dates, ["3/7", "3/6", "3/5", "3/4", "3/3", "3/2", "3/1"]);
    }

    #[test]
    fn anomaly_score_scaled_to_percent() {
        let mut a = cycle("M1", "2024-03-04T08:00:00Z", 0.0);
        a.anomaly_score = 0.2;
        let mut b = cycle("M1", "2024-03-04T09:00:00Z", 0.0);
        b.anomaly_score = 0.6;
        b.anomaly = true;

        let summary = AnomalySummary::compute(&[a, b], &cfg());
        assert!((summary.avg_score_pct - 40.0).abs() < 1e-9);
        assert_eq!(summary.daily[0].anomalies, 1);
    }
}
