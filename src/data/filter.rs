//! Device and time-window filtering of the working set.
//!
//! The window anchor is always the newest record of the *entire* working
//! set, never of a device-filtered subset, so switching devices does not
//! move the window. The anchor is an explicit parameter rather than wall
//! clock time: the engine stays a pure function of its inputs.

use balewatch_types::{DeviceSelector, TelemetryRecord, TimeWindow};
use chrono::{DateTime, Duration, Utc};

/// Window anchor for a working set: the maximum `started_at`, or `None`
/// when the set is empty.
pub fn anchor_of(records: &[TelemetryRecord]) -> Option<DateTime<Utc>> {
    records.iter().map(|r| r.started_at).max()
}

/// Select the records matching the device selector and rolling window.
///
/// Input order is preserved; the result may be empty. Re-applying the same
/// selectors to a result is a no-op (filtering is idempotent).
pub fn filter_records(
    records: &[TelemetryRecord],
    device: &DeviceSelector,
    window: TimeWindow,
    anchor: Option<DateTime<Utc>>,
) -> Vec<TelemetryRecord> {
    let start = window_start(window, anchor);

    records
        .iter()
        .filter(|r| device.matches(&r.device_id) && r.started_at >= start)
        .cloned()
        .collect()
}

/// Lower bound of the window: `anchor - days`, or the epoch origin for the
/// unbounded window (and for an empty working set, where no record can
/// precede the epoch anyway).
fn window_start(window: TimeWindow, anchor: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match (window.bound_days(), anchor) {
        (Some(days), Some(anchor)) => anchor - Duration::hours((days * 24.0) as i64),
        _ => DateTime::<Utc>::UNIX_EPOCH,
    }
}
