//! Aggregate-level tunables.
//!
//! Defaults are the published constants; deployments can override them
//! through a config file or `BALEWATCH_*` environment variables (see the
//! binary).

use serde::Deserialize;

/// Tunable thresholds and slice sizes for the aggregators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// A device is high-risk only when its anomaly count strictly exceeds
    /// this value.
    pub high_risk_min_anomalies: usize,
    /// Lifetime cycle count at which a machine is considered end-of-life.
    pub eol_threshold_cycles: f64,
    /// Weeks used to extrapolate the observed record count to a yearly
    /// cycle total.
    pub annualization_weeks: f64,
    /// Heuristic repair time charged to machines with at least one error,
    /// hours.
    pub assumed_mttr_hours: f64,
    /// Remaining-life percentage below which a machine is flagged near-EOL.
    pub near_eol_cutoff_pct: f64,
    /// Mean anomaly score above which a machine is flagged near-EOL.
    pub anomaly_mean_limit: f64,
    /// Entries kept in the top/bottom ranking and near-EOL lists.
    pub ranking_size: usize,
    /// Machines kept in the idle/active usage split.
    pub usage_slice: usize,
    /// Distinct dates kept in daily trend series.
    pub trend_days: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            high_risk_min_anomalies: 3,
            eol_threshold_cycles: 50_000.0,
            annualization_weeks: 52.0,
            assumed_mttr_hours: 2.5,
            near_eol_cutoff_pct: 10.0,
            anomaly_mean_limit: 0.7,
            ranking_size: 5,
            usage_slice: 8,
            trend_days: 7,
        }
    }
}
