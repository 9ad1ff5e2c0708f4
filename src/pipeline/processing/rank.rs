//! Year-window filtering and per-year magnitude ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{CategoryProfile, RankingMode, YearWindow};
use crate::domain::DisasterRecord;

/// Keep records whose year lies inside `window`. Returns the kept records and
/// how many were dropped.
pub fn filter_by_window(records: Vec<DisasterRecord>, window: &YearWindow) -> (Vec<DisasterRecord>, usize) {
    let before = records.len();
    let kept: Vec<DisasterRecord> = records
        .into_iter()
        .filter(|r| {
            let inside = window.contains(r.year());
            if !inside {
                debug!(
                    year = r.year(),
                    min_year = window.min_year,
                    max_year = window.max_year,
                    "record outside year window"
                );
            }
            inside
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Descending by magnitude, missing magnitude counts as 0
fn by_magnitude_desc(a: &DisasterRecord, b: &DisasterRecord) -> Ordering {
    b.ranking_magnitude().total_cmp(&a.ranking_magnitude())
}

/// Order records ascending by year, applying the ranking mode inside each year.
///
/// Sorting is stable throughout, so records that compare equal keep their
/// input order and the output is deterministic.
pub fn rank(records: Vec<DisasterRecord>, mode: RankingMode) -> Vec<DisasterRecord> {
    let limit = match mode {
        RankingMode::None => {
            let mut records = records;
            records.sort_by_key(|r| r.year());
            return records;
        }
        RankingMode::TopK { k } => Some(k),
        RankingMode::Full => None,
    };

    let mut by_year: BTreeMap<i32, Vec<DisasterRecord>> = BTreeMap::new();
    for record in records {
        by_year.entry(record.year()).or_default().push(record);
    }

    by_year
        .into_iter()
        .flat_map(|(year, mut group)| {
            group.sort_by(by_magnitude_desc);
            if let Some(k) = limit {
                if group.len() > k {
                    debug!(year, kept = k, dropped = group.len() - k, "top-k ranking trimmed year");
                    group.truncate(k);
                }
            }
            group
        })
        .collect()
}

/// Window filter followed by ranking, as configured for one category.
/// Returns the ordered records and the number dropped by the window.
pub fn filter_and_rank(records: Vec<DisasterRecord>, profile: &CategoryProfile) -> (Vec<DisasterRecord>, usize) {
    let (kept, dropped) = filter_by_window(records, &profile.window);
    (rank(kept, profile.ranking), dropped)
}
