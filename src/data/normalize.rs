//! Batch normalization of raw rows into canonical records.
//!
//! Rows whose `cycle_started_at` does not parse are dropped rather than
//! failing the batch; the indices of dropped rows are reported back so
//! callers can surface data-quality warnings if they choose to.

use balewatch_types::{RawCycleRow, TelemetryRecord};

/// Result of normalizing one batch of raw rows.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Records that normalized cleanly, in input order.
    pub records: Vec<TelemetryRecord>,
    /// Input indices of rows dropped for an unparseable timestamp.
    pub rejected: Vec<usize>,
}

impl NormalizedBatch {
    /// Number of rows dropped from the batch.
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Normalize a batch of raw rows.
///
/// Output order matches input order. Dropped rows are recorded by index,
/// not surfaced as errors.
pub fn normalize(rows: &[RawCycleRow]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (index, row) in rows.iter().enumerate() {
        match TelemetryRecord::from_row(row) {
            Some(record) => batch.records.push(record),
            None => {
                tracing::debug!(index, "dropping row with unparseable cycle_started_at");
                batch.rejected.push(index);
            }
        }
    }

    batch
}
