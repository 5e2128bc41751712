//! Monthly KPI rollups.
//!
//! Per-store monthly KPIs with traffic-light ratings, and per-region
//! monthly sell-through rate. The sell-through denominator for the store
//! KPI uses the month's *max* inventory; the regional variant averages
//! daily region-wide inventory first. Both resolve a zero denominator to
//! `None`, NULLIF-style.

use std::collections::BTreeMap;

use stockpulse_core::stats::RunningStats;
use stockpulse_core::window::MonthKey;
use stockpulse_core::Thresholds;

use crate::store::SnapshotStore;
use crate::types::{SellThroughRow, StoreKpiRow, TrafficLight};

fn rate_avg_stock(value: f64, t: &Thresholds) -> TrafficLight {
    if value > t.kpi_avg_stock_green {
        TrafficLight::Green
    } else if value >= t.kpi_avg_stock_yellow {
        TrafficLight::Yellow
    } else {
        TrafficLight::Red
    }
}

fn rate_stockout(value: f64, t: &Thresholds) -> TrafficLight {
    if value < t.kpi_stockout_green {
        TrafficLight::Green
    } else if value <= t.kpi_stockout_yellow {
        TrafficLight::Yellow
    } else {
        TrafficLight::Red
    }
}

fn rate_turnover(value: Option<f64>, t: &Thresholds) -> TrafficLight {
    match value {
        Some(v) if v > t.kpi_turnover_green => TrafficLight::Green,
        Some(v) if v >= t.kpi_turnover_yellow => TrafficLight::Yellow,
        Some(_) => TrafficLight::Red,
        None => TrafficLight::Gray,
    }
}

fn rate_sell_through(value: Option<f64>, t: &Thresholds) -> TrafficLight {
    match value {
        Some(v) if v > t.kpi_sell_through_green => TrafficLight::Green,
        Some(v) if v >= t.kpi_sell_through_yellow => TrafficLight::Yellow,
        Some(_) => TrafficLight::Red,
        None => TrafficLight::Gray,
    }
}

/// Monthly KPI row per store.
pub fn store_kpis(store: &SnapshotStore, thresholds: &Thresholds) -> Vec<StoreKpiRow> {
    struct Acc {
        inventory: RunningStats,
        max_inventory: f64,
        total_sold: f64,
        zero_stock_rows: usize,
    }

    let mut groups: BTreeMap<(String, MonthKey), Acc> = BTreeMap::new();
    for snap in store.snapshots() {
        let acc = groups
            .entry((snap.store_id.clone(), MonthKey::from_date(snap.date)))
            .or_insert(Acc {
                inventory: RunningStats::default(),
                max_inventory: 0.0,
                total_sold: 0.0,
                zero_stock_rows: 0,
            });
        acc.inventory.push(snap.inventory_level);
        acc.max_inventory = acc.max_inventory.max(snap.inventory_level);
        acc.total_sold += snap.units_sold;
        if snap.inventory_level == 0.0 {
            acc.zero_stock_rows += 1;
        }
    }

    groups
        .into_iter()
        .map(|((store_id, month), acc)| {
            let rows = acc.inventory.count();
            let average_stock_level = acc.inventory.mean().unwrap_or(0.0);
            let stockout_rate = acc.zero_stock_rows as f64 / rows as f64;
            let inventory_turnover = if average_stock_level > 0.0 {
                Some(acc.total_sold / average_stock_level)
            } else {
                None
            };
            let denom = acc.total_sold + acc.max_inventory;
            let sell_through_rate = if denom > 0.0 {
                Some(acc.total_sold / denom * 100.0)
            } else {
                None
            };
            StoreKpiRow {
                stock_level_rating: rate_avg_stock(average_stock_level, thresholds),
                stockout_rating: rate_stockout(stockout_rate, thresholds),
                turnover_rating: rate_turnover(inventory_turnover, thresholds),
                sell_through_rating: rate_sell_through(sell_through_rate, thresholds),
                store_id,
                month,
                average_stock_level,
                stockout_rate,
                inventory_turnover,
                sell_through_rate,
            }
        })
        .collect()
}

/// Monthly sell-through rate per region: region-wide daily inventory is
/// summed per day, averaged over the month, and weighed against the
/// month's total sales.
pub fn sell_through_by_region(store: &SnapshotStore) -> Vec<SellThroughRow> {
    // (region, month) -> date -> (daily sales, daily inventory)
    let mut daily: BTreeMap<(String, MonthKey), BTreeMap<chrono::NaiveDate, (f64, f64)>> =
        BTreeMap::new();
    for snap in store.snapshots() {
        let day = daily
            .entry((snap.region_id.clone(), MonthKey::from_date(snap.date)))
            .or_default()
            .entry(snap.date)
            .or_default();
        day.0 += snap.units_sold;
        day.1 += snap.inventory_level;
    }

    daily
        .into_iter()
        .map(|((region_id, month), days)| {
            let total_units_sold: f64 = days.values().map(|d| d.0).sum();
            let inventory: RunningStats = days.values().map(|d| d.1).collect();
            let avg_daily_inventory = inventory.mean().unwrap_or(0.0);
            let denom = total_units_sold + avg_daily_inventory;
            let sell_through_pct = if denom > 0.0 {
                Some(total_units_sold / denom * 100.0)
            } else {
                None
            };
            SellThroughRow {
                region_id,
                month,
                total_units_sold,
                avg_daily_inventory,
                sell_through_pct,
            }
        })
        .collect()
}
