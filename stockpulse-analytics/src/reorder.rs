//! Reorder point engine.
//!
//! Derives a safety-stock-buffered reorder threshold per key from demand
//! statistics over the trailing lead-time window, then classifies current
//! stock against it:
//!
//!   reorder_point = avg_daily_demand * lead_time
//!                 + safety_factor * stddev_daily_demand * sqrt(lead_time)
//!
//! The safety factor is a tuned heuristic multiplier, not a calibrated
//! service-level z-score. Keys with zero observed days in the demand
//! window get a distinct insufficient-data result instead of a spurious
//! reorder point of zero.

use rayon::prelude::*;

use stockpulse_core::stats::RunningStats;
use stockpulse_core::window::TimeWindow;
use stockpulse_core::Thresholds;

use crate::filter::HasObservedDays;
use crate::store::SnapshotStore;
use crate::types::{InsufficientDataRow, ReorderRow, StockStatus};

impl HasObservedDays for ReorderRow {
    fn observed_days(&self) -> usize {
        self.observed_days
    }
}

/// Reorder rows plus the keys that had no demand history at all.
pub struct ReorderComputation {
    pub rows: Vec<ReorderRow>,
    pub no_history: Vec<InsufficientDataRow>,
}

/// First-match-wins stock status classification.
pub fn classify_stock(current_stock: f64, reorder_point: f64, near_multiplier: f64) -> StockStatus {
    if current_stock <= 0.0 {
        StockStatus::OutOfStock
    } else if current_stock < reorder_point {
        StockStatus::BelowReorderPoint
    } else if current_stock < reorder_point * near_multiplier {
        StockStatus::NearReorderPoint
    } else {
        StockStatus::AdequateStock
    }
}

/// Days of supply at the given demand rate. Zero demand means unbounded
/// supply — reported as `None`, never a division error.
pub fn days_of_supply(current_stock: f64, avg_daily_demand: f64) -> Option<f64> {
    if avg_daily_demand > 0.0 {
        Some(current_stock / avg_daily_demand)
    } else {
        None
    }
}

/// Compute a reorder row per full key from the store's history.
pub fn compute(store: &SnapshotStore, thresholds: &Thresholds) -> ReorderComputation {
    let anchor = store.max_date();
    let window = TimeWindow::TrailingDays {
        days: thresholds.lead_time_days,
    };
    let lead_time = f64::from(thresholds.lead_time_days);

    let keys: Vec<_> = store.keys().cloned().collect();
    let mut rows = Vec::with_capacity(keys.len());
    let mut no_history = Vec::new();

    let computed: Vec<_> = keys
        .par_iter()
        .map(|key| {
            let demand: RunningStats = store
                .rows_for(key)
                .filter(|s| window.contains(s.date, anchor))
                .map(|s| s.units_sold)
                .collect();
            // Latest row exists for every key in the store by construction.
            let current_stock = store.latest(key).map(|s| s.inventory_level).unwrap_or(0.0);
            (key.clone(), demand, current_stock)
        })
        .collect();

    for (key, demand, current_stock) in computed {
        let (Some(avg_daily), Some(stddev_daily)) = (demand.mean(), demand.stddev()) else {
            no_history.push(InsufficientDataRow {
                key,
                observed_days: 0,
                required_days: thresholds.min_observation_days,
            });
            continue;
        };

        let reorder_point = avg_daily * lead_time
            + thresholds.safety_factor * stddev_daily * lead_time.sqrt();

        rows.push(ReorderRow {
            status: classify_stock(current_stock, reorder_point, thresholds.near_reorder_multiplier),
            days_of_supply: days_of_supply(current_stock, avg_daily),
            key,
            current_stock,
            observed_days: demand.count(),
            avg_daily_demand: avg_daily,
            demand_stddev: stddev_daily,
            reorder_point,
        });
    }

    ReorderComputation { rows, no_history }
}
