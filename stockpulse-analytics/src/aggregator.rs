//! Window aggregator: grouped statistics over time windows.
//!
//! Groups snapshots by any subset of {store, product, region, category} and
//! computes sum/avg/stddev/count over a window relative to the dataset's
//! anchor date. Aggregation is over *all* days in the window, zero-sale
//! days included — they pull means and stddevs toward zero on purpose,
//! because a no-sale day is demand signal, not missing data.
//!
//! Groups are independent, so stats are computed in parallel per group and
//! the output re-sorted by key for determinism.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use stockpulse_core::error::{AnalyticsError, AnalyticsResult};
use stockpulse_core::snapshot::Snapshot;
use stockpulse_core::stats::RunningStats;
use stockpulse_core::window::TimeWindow;

/// Which key columns to group on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupBy {
    pub store: bool,
    pub product: bool,
    pub region: bool,
    pub category: bool,
}

impl GroupBy {
    pub fn store_product_region() -> Self {
        GroupBy {
            store: true,
            product: true,
            region: true,
            category: false,
        }
    }

    pub fn key_of(&self, snap: &Snapshot) -> GroupKey {
        GroupKey {
            store_id: self.store.then(|| snap.store_id.clone()),
            product_id: self.product.then(|| snap.product_id.clone()),
            region_id: self.region.then(|| snap.region_id.clone()),
            category: self.category.then(|| snap.category.clone()),
        }
    }
}

/// A concrete grouping key value. Unset columns are `None`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub store_id: Option<String>,
    pub product_id: Option<String>,
    pub region_id: Option<String>,
    pub category: Option<String>,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.store_id.as_deref(),
            self.product_id.as_deref(),
            self.region_id.as_deref(),
            self.category.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// Windowed statistics for one group.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GroupStats {
    pub total_units_sold: f64,
    pub avg_units_sold: f64,
    /// Population standard deviation of daily units sold.
    pub stddev_units_sold: f64,
    pub avg_inventory_level: f64,
    /// Number of snapshot rows in the window.
    pub observed_days: usize,
}

/// Compute grouped stats for every distinct key in the window.
pub fn aggregate(
    snapshots: &[Snapshot],
    group_by: GroupBy,
    window: &TimeWindow,
    anchor: NaiveDate,
) -> Vec<(GroupKey, GroupStats)> {
    let mut groups: HashMap<GroupKey, Vec<&Snapshot>> = HashMap::new();
    for snap in snapshots {
        if window.contains(snap.date, anchor) {
            groups.entry(group_by.key_of(snap)).or_default().push(snap);
        }
    }

    let mut result: Vec<(GroupKey, GroupStats)> = groups
        .into_par_iter()
        .map(|(key, rows)| {
            let sales: RunningStats = rows.iter().map(|s| s.units_sold).collect();
            let inventory: RunningStats = rows.iter().map(|s| s.inventory_level).collect();
            let stats = GroupStats {
                total_units_sold: sales.sum(),
                avg_units_sold: sales.mean().unwrap_or(0.0),
                stddev_units_sold: sales.stddev().unwrap_or(0.0),
                avg_inventory_level: inventory.mean().unwrap_or(0.0),
                observed_days: rows.len(),
            };
            (key, stats)
        })
        .collect();

    result.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

/// The distinguished "latest snapshot per group" window: the single row
/// with max(date) per group. Two rows sharing a group's max date make the
/// result undefined; that is a fatal error, never an arbitrary pick.
pub fn latest_per_group<'a>(
    snapshots: &'a [Snapshot],
    group_by: GroupBy,
) -> AnalyticsResult<Vec<(GroupKey, &'a Snapshot)>> {
    let mut latest: HashMap<GroupKey, (&Snapshot, bool)> = HashMap::new();
    for snap in snapshots {
        let key = group_by.key_of(snap);
        match latest.get_mut(&key) {
            None => {
                latest.insert(key, (snap, false));
            }
            Some(entry) => {
                if snap.date > entry.0.date {
                    *entry = (snap, false);
                } else if snap.date == entry.0.date {
                    entry.1 = true;
                }
            }
        }
    }

    let mut result = Vec::with_capacity(latest.len());
    for (key, (snap, tied)) in latest {
        if tied {
            return Err(AnalyticsError::DuplicateKey {
                key: key.to_string(),
                date: snap.date,
            });
        }
        result.push((key, snap));
    }
    result.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(result)
}
