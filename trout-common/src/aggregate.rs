///! Aggregations over parsed lake records

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::types::{DateTotal, DateWindow, LakeRecord};

/// Sum stocked fish per date, ascending by date.
///
/// With a window, only records dated inside it are counted.
pub fn totals_by_date(records: &[LakeRecord], window: Option<&DateWindow>) -> Vec<DateTotal> {
    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        if window.is_some_and(|w| !w.contains(record.date)) {
            continue;
        }
        *totals.entry(record.date).or_insert(0) += record.stocked_fish;
    }

    totals
        .into_iter()
        .map(|(date, total)| DateTotal { date, total })
        .collect()
}

/// Records dated inside the window, in their original order.
pub fn within_window(records: &[LakeRecord], window: &DateWindow) -> Vec<LakeRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.date))
        .cloned()
        .collect()
}

/// Distinct, non-empty derby lake names.
pub fn derby_lake_set<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Mean latitude and mean longitude, or `None` for an empty slice.
pub fn centroid(records: &[LakeRecord]) -> Option<(f64, f64)> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let lat = records.iter().map(|r| r.latitude).sum::<f64>() / n;
    let lon = records.iter().map(|r| r.longitude).sum::<f64>() / n;
    Some((lat, lon))
}

/// Most recent stocking date.
pub fn latest_date(records: &[LakeRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date).max()
}
