use chrono::NaiveDate;

use crate::table::AttributeSnapshot;

/// Most recent snapshot strictly before `as_of`. Same-day snapshots are
/// excluded; with nothing before the cutoff there is no result. Rows tied at
/// the maximum date resolve to the first one in input order.
pub fn latest_before<'a>(
    rows: &[&'a AttributeSnapshot],
    as_of: NaiveDate,
) -> Option<&'a AttributeSnapshot> {
    let mut best: Option<&'a AttributeSnapshot> = None;
    for &row in rows {
        if row.date >= as_of {
            continue;
        }
        // Strictly-greater comparison keeps the earliest-seen row on ties.
        if best.is_none_or(|b| row.date > b.date) {
            best = Some(row);
        }
    }
    best
}
