//! Directional sales trend classification.
//!
//! For each (store, product, calendar month, year) the month's total sales
//! are compared against the mean of the same key's totals from the three
//! calendar months immediately preceding, crossing year boundaries (a
//! February compares against the right November/December/January). More
//! than the configured band above the trailing mean is "Upward", more than
//! the band below is "Downward", otherwise "Stable". A month with no prior
//! data is excluded — null, not zero.
//!
//! Per (store, product, calendar month) the yearly directions become
//! votes; a strict majority wins "Mostly X", anything else is "Mixed" —
//! ties are never broken arbitrarily.

use std::collections::BTreeMap;

use stockpulse_core::window::MonthKey;
use stockpulse_core::Thresholds;

use crate::store::SnapshotStore;
use crate::types::{TrendDirection, TrendLabel, TrendSummaryRow, TrendYearRow};

fn classify(total: f64, trailing_mean: f64, band: f64) -> TrendDirection {
    if total > trailing_mean * (1.0 + band) {
        TrendDirection::Upward
    } else if total < trailing_mean * (1.0 - band) {
        TrendDirection::Downward
    } else {
        TrendDirection::Stable
    }
}

/// Monthly totals per (store, product), chronological.
fn monthly_totals(store: &SnapshotStore) -> BTreeMap<(String, String), BTreeMap<MonthKey, f64>> {
    let mut totals: BTreeMap<(String, String), BTreeMap<MonthKey, f64>> = BTreeMap::new();
    for snap in store.snapshots() {
        *totals
            .entry((snap.store_id.clone(), snap.product_id.clone()))
            .or_default()
            .entry(MonthKey::from_date(snap.date))
            .or_default() += snap.units_sold;
    }
    totals
}

/// Classify every (store, product, year-month) with at least one prior
/// month of data in its trailing three.
pub fn classify_years(store: &SnapshotStore, thresholds: &Thresholds) -> Vec<TrendYearRow> {
    let mut rows = Vec::new();
    for ((store_id, product_id), months) in monthly_totals(store) {
        for (&month, &total) in &months {
            let mut trailing = Vec::with_capacity(3);
            let mut cursor = month;
            for _ in 0..3 {
                cursor = cursor.prev();
                if let Some(&value) = months.get(&cursor) {
                    trailing.push(value);
                }
            }
            if trailing.is_empty() {
                continue; // no prior data: excluded, not zero
            }
            let trailing_mean = trailing.iter().sum::<f64>() / trailing.len() as f64;
            rows.push(TrendYearRow {
                store_id: store_id.clone(),
                product_id: product_id.clone(),
                month,
                total_units_sold: total,
                trailing_mean,
                direction: classify(total, trailing_mean, thresholds.trend_band),
            });
        }
    }
    rows
}

/// Aggregate yearly directions into per-calendar-month vote summaries.
pub fn summarize(year_rows: &[TrendYearRow]) -> Vec<TrendSummaryRow> {
    let mut votes: BTreeMap<(String, String, u32), (usize, usize, usize)> = BTreeMap::new();
    for row in year_rows {
        let entry = votes
            .entry((row.store_id.clone(), row.product_id.clone(), row.month.month))
            .or_default();
        match row.direction {
            TrendDirection::Upward => entry.0 += 1,
            TrendDirection::Downward => entry.1 += 1,
            TrendDirection::Stable => entry.2 += 1,
        }
    }

    votes
        .into_iter()
        .map(|((store_id, product_id, calendar_month), (up, down, stable))| {
            let label = if up > down && up > stable {
                TrendLabel::MostlyUpward
            } else if down > up && down > stable {
                TrendLabel::MostlyDownward
            } else if stable > up && stable > down {
                TrendLabel::MostlyStable
            } else {
                TrendLabel::Mixed
            };
            TrendSummaryRow {
                store_id,
                product_id,
                calendar_month,
                upward_votes: up,
                downward_votes: down,
                stable_votes: stable,
                label,
            }
        })
        .collect()
}
