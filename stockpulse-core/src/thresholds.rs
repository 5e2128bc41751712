//! Centralized classification thresholds.
//!
//! Every cut point used by the analytics engines lives here as a named
//! field with its default, instead of being scattered per engine.
//! Changing a value here affects every component that reads it, so the
//! engines stay mutually consistent.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Thresholds {
    /// Replenishment lead time in days. Demand statistics for reorder
    /// points are taken over a trailing window of this length.
    pub lead_time_days: u32,

    /// Safety stock multiplier applied to demand stddev. This is a tuned
    /// heuristic, not a statistically calibrated service-level z-score.
    pub safety_factor: f64,

    /// Stock within this multiple of the reorder point is "Near Reorder
    /// Point".
    pub near_reorder_multiplier: f64,

    /// Minimum observed days before a key's statistics are trusted.
    /// Applied uniformly by one filter stage; keys under the floor are
    /// reported as insufficient-data, never silently dropped.
    pub min_observation_days: usize,

    /// Relative band around the trailing mean inside which a month's sales
    /// count as "Stable" (0.1 = ±10%).
    pub trend_band: f64,

    /// Monthly turnover above this is "High" movement.
    pub monthly_turnover_high: f64,
    /// Monthly turnover above this (up to the high cut) is "Moderate".
    pub monthly_turnover_moderate: f64,

    /// Rolling window length in months for turnover, consistency, and
    /// stock adjustment recommendations.
    pub rolling_window_months: u32,
    /// Rolling turnover at or above this is "Fast-moving". Deliberately a
    /// different cut than the monthly thresholds: the denominator window
    /// differs, so the ratios are not comparable.
    pub rolling_turnover_fast: f64,
    /// Rolling turnover below this is "Slow-moving".
    pub rolling_turnover_slow: f64,

    /// Inventory at or below this absolute unit count is a low-stock day
    /// for the consistency detector. Deliberately an absolute count, not
    /// a percentage of the key's typical stock.
    pub low_stock_units: f64,
    /// Low-stock-day rate above this flags "Frequent Stockouts".
    pub stockout_rate_max: f64,
    /// Order stddev above this fraction of mean orders flags "Erratic
    /// Ordering".
    pub order_variability_max: f64,
    /// Sales stddev above this fraction of mean sales flags "Erratic
    /// Fulfillment".
    pub sales_variability_max: f64,

    /// A day-over-day inventory jump above this multiple is a
    /// replenishment event (1.2 = 20% increase).
    pub replenishment_jump: f64,

    /// Stock above this multiple of period demand counts as overstocked
    /// when paired with slow movement; it is also the target level for
    /// reduce/increase quantity suggestions.
    pub overstock_demand_multiple: f64,
    /// Fewer than this many periods of supply triggers "Increase stock".
    pub low_supply_periods: f64,
    /// Fast movers under this many periods of supply get the fast-selling
    /// increase recommendation.
    pub fast_mover_supply_periods: f64,

    /// KPI traffic-light bands (monthly, per store).
    pub kpi_avg_stock_green: f64,
    pub kpi_avg_stock_yellow: f64,
    pub kpi_stockout_green: f64,
    pub kpi_stockout_yellow: f64,
    pub kpi_turnover_green: f64,
    pub kpi_turnover_yellow: f64,
    pub kpi_sell_through_green: f64,
    pub kpi_sell_through_yellow: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            lead_time_days: 7,
            safety_factor: 1.5,
            near_reorder_multiplier: 1.2,
            min_observation_days: 7,
            trend_band: 0.10,
            monthly_turnover_high: 3.0,
            monthly_turnover_moderate: 1.0,
            rolling_window_months: 3,
            rolling_turnover_fast: 6.0,
            rolling_turnover_slow: 2.0,
            low_stock_units: 80.0,
            stockout_rate_max: 0.17,
            order_variability_max: 0.6,
            sales_variability_max: 0.9,
            replenishment_jump: 1.2,
            overstock_demand_multiple: 2.0,
            low_supply_periods: 1.5,
            fast_mover_supply_periods: 3.0,
            kpi_avg_stock_green: 100.0,
            kpi_avg_stock_yellow: 70.0,
            kpi_stockout_green: 0.1,
            kpi_stockout_yellow: 0.3,
            kpi_turnover_green: 2.5,
            kpi_turnover_yellow: 1.5,
            kpi_sell_through_green: 70.0,
            kpi_sell_through_yellow: 50.0,
        }
    }
}
