//! The complete analytics report handed to display layers.

use balewatch_types::{DeviceSelector, TelemetryRecord, TimeWindow, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

use crate::data::{
    AnalyticsConfig, AnomalySummary, FleetOverview, HealthSummary, MachineRankings,
    MaintenanceOutlook, OperationalSummary, SafetySummary,
};

/// Every aggregate family over one filtered record set, plus the selector
/// values that produced it.
///
/// This is the engine's output boundary: plain nested data ready for
/// direct rendering, with no further computation expected downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    /// Report format version for forward compatibility.
    pub schema_version: u32,
    /// Device selector token this report was filtered with.
    pub device: String,
    /// Time-window token this report was filtered with.
    pub window: String,
    /// Records in the working set before filtering.
    pub working_set_records: usize,
    /// Records after device/window filtering.
    pub filtered_records: usize,
    /// Rows dropped during the last normalization.
    pub rejected_rows: usize,
    /// `None` when the filtered set is empty.
    pub fleet: Option<FleetOverview>,
    pub rankings: MachineRankings,
    pub safety: SafetySummary,
    pub health: HealthSummary,
    pub anomalies: AnomalySummary,
    /// `None` when the filtered set is empty.
    pub maintenance: Option<MaintenanceOutlook>,
    pub operational: OperationalSummary,
}

impl FleetReport {
    /// Run every aggregator over the filtered set.
    ///
    /// The aggregators are independent; any evaluation order produces the
    /// same report. `working_set_records` and `rejected_rows` start at the
    /// filtered count and zero; session owners overwrite them with the
    /// working-set context (see `Analyzer::report`).
    pub fn generate(
        filtered: &[TelemetryRecord],
        device: &DeviceSelector,
        window: TimeWindow,
        config: &AnalyticsConfig,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            device: device.token().to_string(),
            window: window.token().to_string(),
            working_set_records: filtered.len(),
            filtered_records: filtered.len(),
            rejected_rows: 0,
            fleet: FleetOverview::compute(filtered),
            rankings: MachineRankings::compute(filtered, config),
            safety: SafetySummary::compute(filtered, config),
            health: HealthSummary::compute(filtered, config),
            anomalies: AnomalySummary::compute(filtered, config),
            maintenance: MaintenanceOutlook::compute(filtered, config),
            operational: OperationalSummary::compute(filtered, window, config),
        }
    }
}
