//! Data models and processing: the telemetry derivation and aggregation
//! engine.
//!
//! This module turns raw header-named rows into canonical records and
//! computes the six aggregate families display layers consume.
//!
//! ## Submodules
//!
//! - [`config`]: Aggregate-level tunables ([`AnalyticsConfig`])
//! - [`normalize`]: Raw rows to [`TelemetryRecord`]s with reject reporting
//! - [`filter`]: Device/time-window selection over the working set
//! - [`fleet`]: Fleet-wide overview statistics
//! - [`ranking`]: Per-machine standings and top/bottom slices
//! - [`safety`]: Safety counts, health averages, anomaly ranking
//! - [`maintenance`]: Lifetime extrapolation and EOL planning
//! - [`operational`]: Utilization heatmap, idle/active split, daily trend
//!
//! ## Data Flow
//!
//! ```text
//! Vec<RawCycleRow>
//!        │
//!        ▼
//! normalize() ──▶ NormalizedBatch { records, rejected }
//!        │
//!        ▼
//! filter_records(device, window, anchor)
//!        │
//!        ├──▶ FleetOverview::compute()
//!        ├──▶ MachineRankings::compute()
//!        ├──▶ SafetySummary / HealthSummary / AnomalySummary::compute()
//!        ├──▶ MaintenanceOutlook::compute()
//!        └──▶ OperationalSummary::compute()
//! ```
//!
//! The aggregators are independent readers of the same immutable filtered
//! set and may run in any order or in parallel.
//!
//! [`TelemetryRecord`]: balewatch_types::TelemetryRecord

pub mod config;
pub mod filter;
pub mod fleet;
mod group;
pub mod maintenance;
pub mod normalize;
pub mod operational;
pub mod ranking;
pub mod safety;

pub use config::AnalyticsConfig;
pub use filter::{anchor_of, filter_records};
pub use fleet::FleetOverview;
pub use maintenance::{MachineWear, MaintenanceOutlook};
pub use normalize::{normalize, NormalizedBatch};
pub use operational::{DailyPerformance, HeatmapCell, MachineUsage, OperationalSummary};
pub use ranking::{MachineRankings, MachineStanding, MachineStatus};
pub use safety::{
    AnomalyDaily, AnomalySummary, HealthDaily, HealthSummary, HighRiskMachine, SafetyDaily,
    SafetySummary,
};

#[cfg(test)]
pub(crate) mod testutil {
    use balewatch_types::TelemetryRecord;
    use chrono::{DateTime, Datelike, Timelike, Utc};

    /// A record with the given device, start instant, and cycle duration;
    /// every other field zeroed. Tests adjust fields directly.
    pub fn cycle(device: &str, ts: &str, duration_ms: f64) -> TelemetryRecord {
        let started_at: DateTime<Utc> = ts.parse().expect("test timestamp parses");
        TelemetryRecord {
            device_id: device.to_string(),
            started_at,
            date_key: started_at.date_naive(),
            day_of_week: started_at.weekday().num_days_from_sunday(),
            hour_of_day: started_at.hour(),
            cycle_duration_ms: duration_ms,
            runtime_hours: duration_ms / 3_600_000.0,
            energy_kwh: 0.0,
            bale_increment: 0.0,
            anomaly_score: 0.0,
            anomaly: false,
            e_stop: false,
            overload: false,
            valve_issue: false,
            current_imbalance: 0.0,
            pressure_overshoot: 0.0,
            energy_per_cycle: 0.0,
            door_open_events: 0.0,
            gate_open_events: 0.0,
        }
    }
}
