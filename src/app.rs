//! Analysis session state.
//!
//! An [`Analyzer`] owns a working set of normalized records and a filtered
//! view of it. The working set is replaced wholesale on each ingestion;
//! the filtered view is recomputed - never mutated in place - whenever the
//! device selection, time window, or working set changes. Re-filtering is
//! idempotent and side-effect free, so selector changes can be applied at
//! any rate.

use balewatch_types::{DeviceSelector, RawCycleRow, TelemetryRecord, TimeWindow};
use std::collections::BTreeSet;

use crate::data::{anchor_of, filter_records, normalize, AnalyticsConfig};
use crate::report::FleetReport;

/// Session state for one loaded telemetry batch.
pub struct Analyzer {
    /// The full working set from the last ingestion.
    original: Vec<TelemetryRecord>,
    /// The current filtered view of `original`.
    data: Vec<TelemetryRecord>,
    device: DeviceSelector,
    window: TimeWindow,
    config: AnalyticsConfig,
    /// Input indices of rows dropped by the last ingestion.
    rejected: Vec<usize>,
}

impl Analyzer {
    /// Create an empty session with the given tunables.
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            original: Vec::new(),
            data: Vec::new(),
            device: DeviceSelector::default(),
            window: TimeWindow::default(),
            config,
            rejected: Vec::new(),
        }
    }

    /// Normalize a batch of raw rows and replace the working set with it.
    ///
    /// Returns the number of rows dropped for unparseable timestamps.
    pub fn ingest_rows(&mut self, rows: &[RawCycleRow]) -> usize {
        let batch = normalize(rows);
        self.rejected = batch.rejected;
        self.replace_working_set(batch.records);
        self.rejected.len()
    }

    /// Replace the working set with already-normalized records.
    pub fn ingest_records(&mut self, records: Vec<TelemetryRecord>) {
        self.rejected.clear();
        self.replace_working_set(records);
    }

    fn replace_working_set(&mut self, records: Vec<TelemetryRecord>) {
        self.original = records;
        self.apply_filters();
    }

    /// Change the device selection and re-filter.
    pub fn set_device(&mut self, device: DeviceSelector) {
        self.device = device;
        self.apply_filters();
    }

    /// Change the time window and re-filter.
    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = window;
        self.apply_filters();
    }

    /// Recompute the filtered view from the working set.
    ///
    /// The window anchor is the newest record of the whole working set, so
    /// a device change never moves the window.
    fn apply_filters(&mut self) {
        let anchor = anchor_of(&self.original);
        self.data = filter_records(&self.original, &self.device, self.window, anchor);
    }

    /// The current filtered record set.
    pub fn data(&self) -> &[TelemetryRecord] {
        &self.data
    }

    /// The full working set from the last ingestion.
    pub fn working_set(&self) -> &[TelemetryRecord] {
        &self.original
    }

    /// Input indices of rows dropped by the last ingestion.
    pub fn rejected_rows(&self) -> &[usize] {
        &self.rejected
    }

    /// The current device selector.
    pub fn device(&self) -> &DeviceSelector {
        &self.device
    }

    /// The current time window.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Sorted distinct device ids across the working set.
    pub fn devices(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self.original.iter().map(|r| r.device_id.as_str()).collect();
        ids.into_iter().map(String::from).collect()
    }

    /// True when nothing has been ingested (or everything was rejected).
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Run every aggregator over the current filtered set.
    pub fn report(&self) -> FleetReport {
        let mut report =
            FleetReport::generate(&self.data, &self.device, self.window, &self.config);
        report.working_set_records = self.original.len();
        report.rejected_rows = self.rejected.len();
        report
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::cycle;
    use balewatch_types::FieldValue;

    fn raw_row(device: &str, ts: &str) -> RawCycleRow {
        let mut row = RawCycleRow::new();
        row.insert("device_id".into(), FieldValue::Text(device.into()));
        row.insert("cycle_started_at".into(), FieldValue::Text(ts.into()));
        row.insert("cycle_duration_ms".into(), FieldValue::Number(3_600_000.0));
        row
    }

    #[test]
    fn ingest_replaces_the_working_set_wholesale() {
        let mut analyzer = Analyzer::default();
        analyzer.ingest_rows(&[raw_row("M1", "2024-03-04T08:00:00Z")]);
        assert_eq!(analyzer.working_set().len(), 1);

        analyzer.ingest_rows(&[
            raw_row("M2", "2024-03-05T08:00:00Z"),
            raw_row("M3", "2024-03-05T09:00:00Z"),
        ]);
        assert_eq!(analyzer.working_set().len(), 2);
        assert!(analyzer.working_set().iter().all(|r| r.device_id != "M1"));
    }

    #[test]
    fn ingest_reports_rejected_rows() {
        let mut analyzer = Analyzer::default();
        let dropped = analyzer.ingest_rows(&[
            raw_row("M1", "2024-03-04T08:00:00Z"),
            raw_row("M1", "never"),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(analyzer.rejected_rows(), &[1]);
        assert_eq!(analyzer.working_set().len(), 1);
    }

    #[test]
    fn selector_changes_refilter_without_touching_the_working_set() {
        let mut analyzer = Analyzer::default();
        analyzer.ingest_records(vec![
            cycle("M1", "2024-03-01T08:00:00Z", 3_600_000.0),
            cycle("M2", "2024-03-10T08:00:00Z", 3_600_000.0),
        ]);
        assert_eq!(analyzer.data().len(), 1); // default 7d window

        analyzer.set_window(TimeWindow::All);
        assert_eq!(analyzer.data().len(), 2);

        analyzer.set_device(DeviceSelector::Device("M1".into()));
        assert_eq!(analyzer.data().len(), 1);
        assert_eq!(analyzer.working_set().len(), 2);
    }

    #[test]
    fn refiltering_with_same_selectors_is_stable() {
        let mut analyzer = Analyzer::default();
        analyzer.ingest_records(vec![
            cycle("M1", "2024-03-04T08:00:00Z", 3_600_000.0),
            cycle("M2", "2024-03-05T08:00:00Z", 3_600_000.0),
        ]);

        let before = analyzer.data().to_vec();
        analyzer.set_window(analyzer.window());
        analyzer.set_device(analyzer.device().clone());
        assert_eq!(analyzer.data(), before.as_slice());
    }

    #[test]
    fn devices_are_sorted_and_distinct() {
        let mut analyzer = Analyzer::default();
        analyzer.ingest_records(vec![
            cycle("M9", "2024-03-04T08:00:00Z", 0.0),
            cycle("M1", "2024-03-04T09:00:00Z", 0.0),
            cycle("M9", "2024-03-04T10:00:00Z", 0.0),
        ]);
        assert_eq!(analyzer.devices(), ["M1", "M9"]);
    }

    #[test]
    fn report_carries_working_set_context() {
        let mut analyzer = Analyzer::default();
        analyzer.ingest_rows(&[
            raw_row("M1", "2024-03-04T08:00:00Z"),
            raw_row("M1", "bogus"),
        ]);
        analyzer.set_device(DeviceSelector::Device("M9".into()));

        let report = analyzer.report();
        assert_eq!(report.working_set_records, 1);
        assert_eq!(report.filtered_records, 0);
        assert_eq!(report.rejected_rows, 1);
        assert!(report.fleet.is_none());
    }
}
