//! Supplier consistency and anomaly detection.
//!
//! Over the trailing rolling window per (store, product, region), flags
//! keys with frequent low-stock days, erratic ordering, or erratic
//! fulfillment, based on variance-to-mean ratios. First match wins:
//! stockouts dominate, then ordering, then fulfillment.
//!
//! The low-stock threshold is an absolute unit count, not a percentage of
//! the key's typical stock (see `Thresholds::low_stock_units`).

use rayon::prelude::*;

use stockpulse_core::stats::RunningStats;
use stockpulse_core::window::TimeWindow;
use stockpulse_core::Thresholds;

use crate::filter::HasObservedDays;
use crate::store::SnapshotStore;
use crate::types::{ConsistencyRow, ConsistencyStatus};

impl HasObservedDays for ConsistencyRow {
    fn observed_days(&self) -> usize {
        self.observed_days
    }
}

fn classify(row: &ConsistencyRow, thresholds: &Thresholds) -> ConsistencyStatus {
    if row.stockout_rate > thresholds.stockout_rate_max {
        ConsistencyStatus::FrequentStockouts
    } else if row.order_stddev > row.avg_units_ordered * thresholds.order_variability_max {
        ConsistencyStatus::ErraticOrdering
    } else if row.sales_stddev > row.avg_units_sold * thresholds.sales_variability_max {
        ConsistencyStatus::ErraticFulfillment
    } else {
        ConsistencyStatus::Consistent
    }
}

/// Compute a consistency row per key over the trailing window. Keys with
/// no rows in the window are omitted (nothing to rate); the observation
/// floor is applied by the caller's filter stage.
pub fn compute(store: &SnapshotStore, thresholds: &Thresholds) -> Vec<ConsistencyRow> {
    let anchor = store.max_date();
    let window = TimeWindow::TrailingMonths {
        months: thresholds.rolling_window_months,
    };

    let keys: Vec<_> = store.keys().cloned().collect();
    let mut rows: Vec<ConsistencyRow> = keys
        .par_iter()
        .filter_map(|key| {
            let mut orders = RunningStats::default();
            let mut sales = RunningStats::default();
            let mut low_stock_days = 0usize;
            for snap in store
                .rows_for(key)
                .filter(|s| window.contains(s.date, anchor))
            {
                orders.push(snap.units_ordered);
                sales.push(snap.units_sold);
                if snap.inventory_level <= thresholds.low_stock_units {
                    low_stock_days += 1;
                }
            }
            let observed_days = sales.count();
            if observed_days == 0 {
                return None;
            }
            let mut row = ConsistencyRow {
                key: key.clone(),
                observed_days,
                low_stock_days,
                stockout_rate: low_stock_days as f64 / observed_days as f64,
                avg_units_ordered: orders.mean().unwrap_or(0.0),
                order_stddev: orders.stddev().unwrap_or(0.0),
                avg_units_sold: sales.mean().unwrap_or(0.0),
                sales_stddev: sales.stddev().unwrap_or(0.0),
                status: ConsistencyStatus::Consistent,
            };
            row.status = classify(&row, thresholds);
            Some(row)
        })
        .collect();

    rows.sort_by(|a, b| (a.status, &a.key).cmp(&(b.status, &b.key)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use stockpulse_core::Snapshot;

    fn series(values: impl Fn(u64) -> (f64, f64, f64), days: u64) -> SnapshotStore {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows: Vec<Snapshot> = (0..days)
            .map(|i| {
                let (inventory, sold, ordered) = values(i);
                Snapshot {
                    date: start + Days::new(i),
                    store_id: "S1".into(),
                    product_id: "P1".into(),
                    region_id: "North".into(),
                    category: "Clothing".into(),
                    inventory_level: inventory,
                    units_sold: sold,
                    units_ordered: ordered,
                    current_price: 25.0,
                    demand_forecast: sold,
                    season: None,
                    weather: None,
                    promotion: None,
                }
            })
            .collect();
        SnapshotStore::from_snapshots(rows).unwrap()
    }

    #[test]
    fn frequent_low_stock_days_flagged_first() {
        // 20 of 60 days at or under the 80-unit threshold: rate 0.33.
        // Orders are also erratic, but stockouts win per the priority.
        let store = series(
            |i| {
                let inventory = if i % 3 == 0 { 50.0 } else { 200.0 };
                let ordered = if i % 2 == 0 { 0.0 } else { 100.0 };
                (inventory, 5.0, ordered)
            },
            60,
        );
        let rows = compute(&store, &Thresholds::default());
        assert_eq!(rows[0].status, ConsistencyStatus::FrequentStockouts);
        assert!(rows[0].stockout_rate > 0.17);
    }

    #[test]
    fn erratic_ordering_by_variance_to_mean() {
        // Orders alternate 0/100: mean 50, population stddev 50 > 0.6*50.
        let store = series(
            |i| {
                let ordered = if i % 2 == 0 { 0.0 } else { 100.0 };
                (500.0, 5.0, ordered)
            },
            30,
        );
        let rows = compute(&store, &Thresholds::default());
        assert_eq!(rows[0].status, ConsistencyStatus::ErraticOrdering);
        assert!(rows[0].order_stddev > rows[0].avg_units_ordered * 0.6);
    }

    #[test]
    fn erratic_fulfillment_when_only_sales_vary() {
        // Steady orders, sales alternating 0/40: stddev 20 > 0.9 * 20.
        let store = series(
            |i| {
                let sold = if i % 2 == 0 { 0.0 } else { 40.0 };
                (500.0, sold, 30.0)
            },
            30,
        );
        let rows = compute(&store, &Thresholds::default());
        assert_eq!(rows[0].status, ConsistencyStatus::ErraticFulfillment);
    }

    #[test]
    fn steady_key_is_consistent() {
        let store = series(|_| (500.0, 10.0, 30.0), 30);
        let rows = compute(&store, &Thresholds::default());
        assert_eq!(rows[0].status, ConsistencyStatus::Consistent);
        assert_eq!(rows[0].stockout_rate, 0.0);
    }

    #[test]
    fn raw_numbers_accompany_the_label() {
        let store = series(|_| (500.0, 10.0, 30.0), 30);
        let row = &compute(&store, &Thresholds::default())[0];
        assert_eq!(row.observed_days, 30);
        assert_eq!(row.avg_units_sold, 10.0);
        assert_eq!(row.avg_units_ordered, 30.0);
    }
}
