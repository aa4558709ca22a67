//! Encounter-order grouping helpers shared by the aggregators.
//!
//! Grouping preserves the order keys are first seen in the filtered set,
//! not sorted order. Daily trend series rely on this: the trailing slice
//! keeps the last N *discovered* dates, which only coincides with the last
//! N calendar dates when the input happens to be chronological.

use balewatch_types::TelemetryRecord;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Group records by device id, first-seen order.
pub(crate) fn group_by_device<'a>(
    records: &'a [TelemetryRecord],
) -> Vec<(&'a str, Vec<&'a TelemetryRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&TelemetryRecord>)> = Vec::new();

    for record in records {
        let i = *index.entry(&record.device_id).or_insert_with(|| {
            groups.push((record.device_id.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[i].1.push(record);
    }

    groups
}

/// Group records by calendar date in first-seen order, keeping only the
/// trailing `keep` groups.
pub(crate) fn trailing_daily_groups<'a>(
    records: &'a [TelemetryRecord],
    keep: usize,
) -> Vec<(NaiveDate, Vec<&'a TelemetryRecord>)> {
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();
    let mut groups: Vec<(NaiveDate, Vec<&TelemetryRecord>)> = Vec::new();

    for record in records {
        let i = *index.entry(record.date_key).or_insert_with(|| {
            groups.push((record.date_key, Vec::new()));
            groups.len() - 1
        });
        groups[i].1.push(record);
    }

    if groups.len() > keep {
        groups.drain(..groups.len() - keep);
    }
    groups
}

/// Compact `month/day` label for a trend bucket, no zero padding.
pub(crate) fn date_label(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Mean of `f` over the records, 0 when empty.
pub(crate) fn mean_by<F>(records: &[&TelemetryRecord], f: F) -> f64
where
    F: Fn(&TelemetryRecord) -> f64,
{
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| f(r)).sum::<f64>() / records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::cycle;

    #[test]
    fn device_groups_keep_first_seen_order() {
        let records = vec![
            cycle("B", "2024-03-04T08:00:00Z", 0.0),
            cycle("A", "2024-03-04T09:00:00Z", 0.0),
            cycle("B", "2024-03-04T10:00:00Z", 0.0),
        ];
        let groups = group_by_device(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "B");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "A");
    }

    #[test]
    fn daily_groups_follow_discovery_order_not_calendar_order() {
        let records = vec![
            cycle("A", "2024-03-06T08:00:00Z", 0.0),
            cycle("A", "2024-03-02T08:00:00Z", 0.0),
            cycle("A", "2024-03-06T12:00:00Z", 0.0),
            cycle("A", "2024-03-04T08:00:00Z", 0.0),
        ];
        let groups = trailing_daily_groups(&records, 7);
        let dates: Vec<String> = groups.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, ["2024-03-06", "2024-03-02", "2024-03-04"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn trailing_slice_drops_earliest_discovered_dates() {
        let records: Vec<_> = (1..=10)
            .map(|day| cycle("A", &format!("2024-03-{day:02}T08:00:00Z"), 0.0))
            .collect();
        let groups = trailing_daily_groups(&records, 7);
        assert_eq!(groups.len(), 7);
        assert_eq!(date_label(groups[0].0), "3/4");
        assert_eq!(date_label(groups[6].0), "3/10");
    }

    #[test]
    fn labels_have_no_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(date_label(date), "3/4");
        let date = NaiveDate::from_ymd_opt(2024, 11, 23).unwrap();
        assert_eq!(date_label(date), "11/23");
    }

    #[test]
    fn mean_by_guards_empty_input() {
        assert_eq!(mean_by(&[], |r| r.runtime_hours), 0.0);
    }
}
