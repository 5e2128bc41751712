//! Turnover ratio and movement classification.
//!
//! `turnover_ratio = units_sold_in_period / avg_inventory_in_period`. A
//! zero-inventory denominator yields a null ratio classified "No Sales",
//! never an error. Monthly and rolling-window ratios use *different* cut
//! points — the denominator window differs, so one cutoff set cannot
//! serve both (see `Thresholds`).
//!
//! The rolling window also drives the stock adjustment recommendation,
//! which combines movement class with periods of supply.

use std::collections::BTreeMap;

use rayon::prelude::*;

use stockpulse_core::stats::RunningStats;
use stockpulse_core::window::{MonthKey, TimeWindow};
use stockpulse_core::Thresholds;

use crate::store::SnapshotStore;
use crate::types::{
    MonthlyMovement, MonthlyTurnoverRow, RollingMovement, RollingTurnoverRow, StockAdjustment,
};

fn classify_monthly(ratio: Option<f64>, thresholds: &Thresholds) -> MonthlyMovement {
    match ratio {
        Some(r) if r > thresholds.monthly_turnover_high => MonthlyMovement::High,
        Some(r) if r > thresholds.monthly_turnover_moderate => MonthlyMovement::Moderate,
        Some(r) if r > 0.0 => MonthlyMovement::Low,
        _ => MonthlyMovement::NoSales,
    }
}

fn classify_rolling(ratio: Option<f64>, thresholds: &Thresholds) -> RollingMovement {
    match ratio {
        Some(r) if r <= 0.0 => RollingMovement::NoSales,
        Some(r) if r >= thresholds.rolling_turnover_fast => RollingMovement::FastMoving,
        Some(r) if r < thresholds.rolling_turnover_slow => RollingMovement::SlowMoving,
        Some(_) => RollingMovement::Moderate,
        None => RollingMovement::NoSales,
    }
}

fn turnover_ratio(total_sold: f64, avg_inventory: f64) -> Option<f64> {
    if avg_inventory > 0.0 {
        Some(total_sold / avg_inventory)
    } else {
        None
    }
}

/// Monthly turnover per key, every calendar month in the key's history.
pub fn compute_monthly(store: &SnapshotStore, thresholds: &Thresholds) -> Vec<MonthlyTurnoverRow> {
    let keys: Vec<_> = store.keys().cloned().collect();
    let mut rows: Vec<MonthlyTurnoverRow> = keys
        .par_iter()
        .flat_map_iter(|key| {
            let mut months: BTreeMap<MonthKey, (f64, RunningStats)> = BTreeMap::new();
            for snap in store.rows_for(key) {
                let entry = months.entry(MonthKey::from_date(snap.date)).or_default();
                entry.0 += snap.units_sold;
                entry.1.push(snap.inventory_level);
            }
            months
                .into_iter()
                .map(|(month, (total_sold, inventory))| {
                    let avg_inventory = inventory.mean().unwrap_or(0.0);
                    let ratio = turnover_ratio(total_sold, avg_inventory);
                    MonthlyTurnoverRow {
                        key: key.clone(),
                        month,
                        total_units_sold: total_sold,
                        avg_inventory_level: avg_inventory,
                        turnover_ratio: ratio,
                        movement: classify_monthly(ratio, thresholds),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect();

    rows.sort_by(|a, b| (&a.key, a.month).cmp(&(&b.key, b.month)));
    rows
}

/// Rolling-window turnover per key, anchored at the dataset max date, plus
/// the stock adjustment recommendation.
pub fn compute_rolling(store: &SnapshotStore, thresholds: &Thresholds) -> Vec<RollingTurnoverRow> {
    let anchor = store.max_date();
    let window = TimeWindow::TrailingMonths {
        months: thresholds.rolling_window_months,
    };

    let keys: Vec<_> = store.keys().cloned().collect();
    let mut rows: Vec<RollingTurnoverRow> = keys
        .par_iter()
        .map(|key| {
            let mut total_sold = 0.0;
            let mut inventory = RunningStats::default();
            for snap in store
                .rows_for(key)
                .filter(|s| window.contains(s.date, anchor))
            {
                total_sold += snap.units_sold;
                inventory.push(snap.inventory_level);
            }
            let avg_inventory = inventory.mean().unwrap_or(0.0);
            let ratio = turnover_ratio(total_sold, avg_inventory);
            let movement = classify_rolling(ratio, thresholds);
            let current_stock = store.latest(key).map(|s| s.inventory_level).unwrap_or(0.0);
            let supply_periods = if total_sold > 0.0 {
                Some(current_stock / total_sold)
            } else {
                None
            };
            let adjustment =
                recommend(movement, current_stock, total_sold, supply_periods, thresholds);
            RollingTurnoverRow {
                key: key.clone(),
                window_months: thresholds.rolling_window_months,
                total_units_sold: total_sold,
                avg_inventory_level: avg_inventory,
                turnover_ratio: ratio,
                movement,
                current_stock,
                supply_periods,
                adjustment,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.key.cmp(&b.key));
    rows
}

/// First-match-wins recommendation. Quantities appear only on the two
/// quantity-bearing branches.
fn recommend(
    movement: RollingMovement,
    current_stock: f64,
    period_demand: f64,
    supply_periods: Option<f64>,
    thresholds: &Thresholds,
) -> StockAdjustment {
    let slow = matches!(
        movement,
        RollingMovement::SlowMoving | RollingMovement::NoSales
    );
    let target = thresholds.overstock_demand_multiple * period_demand;

    if slow && current_stock > target && current_stock > 0.0 {
        return StockAdjustment::ReduceStock(current_stock - target);
    }
    if let Some(periods) = supply_periods {
        if periods < thresholds.low_supply_periods {
            return StockAdjustment::IncreaseStock(target - current_stock);
        }
        if movement == RollingMovement::FastMoving && periods < thresholds.fast_mover_supply_periods
        {
            return StockAdjustment::IncreaseStockFastSelling;
        }
    }
    StockAdjustment::MaintainCurrentLevel
}
