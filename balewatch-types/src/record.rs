//! Canonical telemetry record for one machine duty cycle.
//!
//! [`TelemetryRecord::from_row`] turns a raw header-named row into the
//! canonical shape, computing every derived field the analytics engine
//! reads. Rows whose `cycle_started_at` does not parse to a valid instant
//! produce `None` and never enter a working set.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::field::{RawCycleRow, RowFields};

/// Health score above which a cycle is flagged anomalous.
pub const ANOMALY_SCORE_THRESHOLD: f64 = 0.5;

/// Milliseconds per hour, used for the runtime conversion.
const MS_PER_HOUR: f64 = 3_600_000.0;

/// One machine duty cycle with all derived fields.
///
/// Records are constructed once during normalization and are immutable
/// afterwards; aggregators only read them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    /// Stable identifier of the physical machine.
    pub device_id: String,
    /// Instant the cycle started.
    pub started_at: DateTime<Utc>,
    /// Calendar date of `started_at`, used for daily grouping.
    pub date_key: NaiveDate,
    /// Day of week of `started_at`, 0 = Sunday through 6 = Saturday.
    pub day_of_week: u32,
    /// Hour of day of `started_at`, 0-23.
    pub hour_of_day: u32,
    /// Cycle duration in milliseconds, floored at 0.
    pub cycle_duration_ms: f64,
    /// `cycle_duration_ms` converted to hours.
    pub runtime_hours: f64,
    /// Active energy drawn over the cycle, kWh.
    pub energy_kwh: f64,
    /// Bales produced by this cycle.
    pub bale_increment: f64,
    /// Precomputed health indicator in [0, 1].
    pub anomaly_score: f64,
    /// `anomaly_score` thresholded at [`ANOMALY_SCORE_THRESHOLD`].
    pub anomaly: bool,
    /// Emergency stop triggered during the cycle.
    pub e_stop: bool,
    /// Overload trip during the cycle.
    pub overload: bool,
    /// Valve extend or retract feedback reported not-OK.
    pub valve_issue: bool,
    /// Spread of the three phase currents relative to their mean, percent.
    /// May exceed 100; 0 when the mean is 0.
    pub current_imbalance: f64,
    /// Peak hydraulic pressure relative to the cycle average, percent.
    /// 0 when the average pressure is 0.
    pub pressure_overshoot: f64,
    /// Energy attributed to this single cycle (alias of `energy_kwh`).
    pub energy_per_cycle: f64,
    /// Door-open events counted during the cycle.
    pub door_open_events: f64,
    /// Gate-open events counted during the cycle.
    pub gate_open_events: f64,
}

impl TelemetryRecord {
    /// Build a record from a raw row, computing all derived fields.
    ///
    /// Returns `None` when `cycle_started_at` is absent or does not parse
    /// to a valid instant. Missing numeric counters read as 0; fault flags
    /// follow the [`RowFields`] coercions.
    pub fn from_row(row: &RawCycleRow) -> Option<Self> {
        let started_at = row.text("cycle_started_at").and_then(parse_instant)?;

        let cycle_duration_ms = row.num_or_zero("cycle_duration_ms").max(0.0);
        let energy_kwh = row.num_or_zero("energy_active_kwh");

        let phase_a = row.num_or_zero("electrical_peak_current_rms_phase_a_a");
        let phase_b = row.num_or_zero("electrical_peak_current_rms_phase_b_a");
        let phase_c = row.num_or_zero("electrical_peak_current_rms_phase_c_a");
        let phase_mean = (phase_a + phase_b + phase_c) / 3.0;
        let current_imbalance = if phase_mean == 0.0 {
            0.0
        } else {
            let spread = phase_a.max(phase_b).max(phase_c) - phase_a.min(phase_b).min(phase_c);
            spread / phase_mean * 100.0
        };

        let max_pressure = row.num_or_zero("hydraulic_max_pressure_psi");
        let avg_pressure = row.num_or_zero("hydraulic_avg_pressure_psi");
        let pressure_overshoot = if avg_pressure == 0.0 {
            0.0
        } else {
            (max_pressure - avg_pressure) / avg_pressure * 100.0
        };

        let anomaly_score = row.num_or_zero("health_anomaly_score");

        Some(Self {
            device_id: row.text("device_id").unwrap_or_default().to_string(),
            started_at,
            date_key: started_at.date_naive(),
            day_of_week: started_at.weekday().num_days_from_sunday(),
            hour_of_day: started_at.hour(),
            cycle_duration_ms,
            runtime_hours: cycle_duration_ms / MS_PER_HOUR,
            energy_kwh,
            bale_increment: row.num_or_zero("productivity_bale_count_increment"),
            anomaly_score,
            anomaly: anomaly_score > ANOMALY_SCORE_THRESHOLD,
            e_stop: row.flag("di_e_stop_triggered"),
            overload: row.flag("di_overload_trip"),
            valve_issue: row.is_literal_false("di_valve_extend_feedback_ok")
                || row.is_literal_false("di_valve_retract_feedback_ok"),
            current_imbalance,
            pressure_overshoot,
            energy_per_cycle: energy_kwh,
            door_open_events: row.num_or_zero("di_door_open_events"),
            gate_open_events: row.num_or_zero("di_gate_open_events"),
        })
    }

    /// An e-stop or overload occurred during this cycle.
    pub fn has_error(&self) -> bool {
        self.e_stop || self.overload
    }
}

/// Parse a timestamp cell into a UTC instant.
///
/// Accepts RFC 3339 and the common naive export formats
/// (`2024-03-04T09:30:00`, `2024-03-04 09:30:00`, with optional fractional
/// seconds). Naive forms are taken as UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}
