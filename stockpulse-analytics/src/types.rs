//! Report row types and classification labels.
//!
//! Every row carries the raw numbers its label was derived from, so a
//! consumer can audit why the label was assigned — never a bare label.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use stockpulse_core::window::MonthKey;
use stockpulse_core::SnapshotKey;

// ---------------------------------------------------------------------------
// Stock status (reorder point engine, seasonal adjustment)
// ---------------------------------------------------------------------------

/// Four-tier stock status, ordered worst-first. The derived `Ord` gives the
/// report's classification priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StockStatus {
    OutOfStock,
    BelowReorderPoint,
    NearReorderPoint,
    AdequateStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::OutOfStock => write!(f, "Out of Stock"),
            StockStatus::BelowReorderPoint => write!(f, "Below Reorder Point"),
            StockStatus::NearReorderPoint => write!(f, "Near Reorder Point"),
            StockStatus::AdequateStock => write!(f, "Adequate Stock"),
        }
    }
}

/// Reorder point computation for one key.
#[derive(Clone, Debug, Serialize)]
pub struct ReorderRow {
    pub key: SnapshotKey,
    pub current_stock: f64,
    /// Days observed in the demand window; under the observation floor the
    /// row lands in the report's insufficient-data set instead.
    pub observed_days: usize,
    pub avg_daily_demand: f64,
    pub demand_stddev: f64,
    pub reorder_point: f64,
    /// `None` means unbounded supply (zero average demand), not zero days.
    pub days_of_supply: Option<f64>,
    pub status: StockStatus,
}

/// A key excluded from a statistic by the uniform observation floor.
#[derive(Clone, Debug, Serialize)]
pub struct InsufficientDataRow {
    pub key: SnapshotKey,
    pub observed_days: usize,
    pub required_days: usize,
}

/// Seasonally adjusted reorder computation for one key.
#[derive(Clone, Debug, Serialize)]
pub struct SeasonalReorderRow {
    pub key: SnapshotKey,
    /// Season tag of the key's latest snapshot; factor 1.0 when absent.
    pub season: Option<String>,
    pub seasonal_factor: f64,
    pub current_stock: f64,
    pub standard_reorder_point: f64,
    pub seasonal_reorder_point: f64,
    pub days_of_supply: Option<f64>,
    pub status: StockStatus,
}

/// Seasonal demand multiplier for one (product, region, season).
#[derive(Clone, Debug, Serialize)]
pub struct SeasonalFactorRow {
    pub product_id: String,
    pub region_id: String,
    pub season: String,
    pub season_avg_units_sold: f64,
    pub overall_avg_units_sold: f64,
    pub factor: f64,
}

/// Average demand per (category, season) over all history.
#[derive(Clone, Debug, Serialize)]
pub struct SeasonDemandRow {
    pub category: String,
    pub season: String,
    pub avg_units_sold: f64,
}

// ---------------------------------------------------------------------------
// Turnover and movement
// ---------------------------------------------------------------------------

/// Movement class for a single calendar month of turnover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MonthlyMovement {
    High,
    Moderate,
    Low,
    NoSales,
}

impl fmt::Display for MonthlyMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthlyMovement::High => write!(f, "High"),
            MonthlyMovement::Moderate => write!(f, "Moderate"),
            MonthlyMovement::Low => write!(f, "Low"),
            MonthlyMovement::NoSales => write!(f, "No Sales"),
        }
    }
}

/// Movement class for the rolling multi-month window. Different cut points
/// than the monthly class because the denominator window differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RollingMovement {
    FastMoving,
    Moderate,
    SlowMoving,
    NoSales,
}

impl fmt::Display for RollingMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollingMovement::FastMoving => write!(f, "Fast-moving"),
            RollingMovement::Moderate => write!(f, "Moderate"),
            RollingMovement::SlowMoving => write!(f, "Slow-moving"),
            RollingMovement::NoSales => write!(f, "No Sales"),
        }
    }
}

/// Turnover for one key in one calendar month.
#[derive(Clone, Debug, Serialize)]
pub struct MonthlyTurnoverRow {
    pub key: SnapshotKey,
    pub month: MonthKey,
    pub total_units_sold: f64,
    pub avg_inventory_level: f64,
    /// `None` when average inventory is zero; classified "No Sales" — a
    /// zero denominator is never an error.
    pub turnover_ratio: Option<f64>,
    pub movement: MonthlyMovement,
}

/// Stock adjustment recommendation. Suggested quantities exist only for the
/// two quantity-bearing action branches.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", content = "suggested_units")]
pub enum StockAdjustment {
    ReduceStock(f64),
    IncreaseStock(f64),
    IncreaseStockFastSelling,
    MaintainCurrentLevel,
}

impl fmt::Display for StockAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockAdjustment::ReduceStock(units) => write!(f, "Reduce stock by {units:.0}"),
            StockAdjustment::IncreaseStock(units) => write!(f, "Increase stock by {units:.0}"),
            StockAdjustment::IncreaseStockFastSelling => {
                write!(f, "Increase stock: fast-selling")
            }
            StockAdjustment::MaintainCurrentLevel => write!(f, "Maintain current level"),
        }
    }
}

/// Rolling-window turnover and the stock adjustment derived from it.
#[derive(Clone, Debug, Serialize)]
pub struct RollingTurnoverRow {
    pub key: SnapshotKey,
    pub window_months: u32,
    pub total_units_sold: f64,
    pub avg_inventory_level: f64,
    pub turnover_ratio: Option<f64>,
    pub movement: RollingMovement,
    pub current_stock: f64,
    /// Periods of supply at the window's demand rate; `None` when the
    /// window had no sales.
    pub supply_periods: Option<f64>,
    pub adjustment: StockAdjustment,
}

// ---------------------------------------------------------------------------
// Trend classification
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Upward => write!(f, "Upward"),
            TrendDirection::Downward => write!(f, "Downward"),
            TrendDirection::Stable => write!(f, "Stable"),
        }
    }
}

/// One year's classification of a calendar month against its trailing
/// 3-month mean.
#[derive(Clone, Debug, Serialize)]
pub struct TrendYearRow {
    pub store_id: String,
    pub product_id: String,
    pub month: MonthKey,
    pub total_units_sold: f64,
    pub trailing_mean: f64,
    pub direction: TrendDirection,
}

/// Majority label across years, worst-first ordering for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TrendLabel {
    MostlyDownward,
    Mixed,
    MostlyStable,
    MostlyUpward,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendLabel::MostlyDownward => write!(f, "Mostly Downward"),
            TrendLabel::Mixed => write!(f, "Mixed"),
            TrendLabel::MostlyStable => write!(f, "Mostly Stable"),
            TrendLabel::MostlyUpward => write!(f, "Mostly Upward"),
        }
    }
}

/// Trend votes for one (store, product, calendar month) across all years.
#[derive(Clone, Debug, Serialize)]
pub struct TrendSummaryRow {
    pub store_id: String,
    pub product_id: String,
    /// Calendar month 1-12, aggregated across years.
    pub calendar_month: u32,
    pub upward_votes: usize,
    pub downward_votes: usize,
    pub stable_votes: usize,
    pub label: TrendLabel,
}

// ---------------------------------------------------------------------------
// Consistency / anomaly detection
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConsistencyStatus {
    FrequentStockouts,
    ErraticOrdering,
    ErraticFulfillment,
    Consistent,
}

impl fmt::Display for ConsistencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyStatus::FrequentStockouts => write!(f, "Frequent Stockouts"),
            ConsistencyStatus::ErraticOrdering => write!(f, "Erratic Ordering"),
            ConsistencyStatus::ErraticFulfillment => write!(f, "Erratic Fulfillment"),
            ConsistencyStatus::Consistent => write!(f, "Consistent"),
        }
    }
}

/// Ordering/fulfillment consistency over the trailing window for one key.
#[derive(Clone, Debug, Serialize)]
pub struct ConsistencyRow {
    pub key: SnapshotKey,
    pub observed_days: usize,
    pub low_stock_days: usize,
    pub stockout_rate: f64,
    pub avg_units_ordered: f64,
    pub order_stddev: f64,
    pub avg_units_sold: f64,
    pub sales_stddev: f64,
    pub status: ConsistencyStatus,
}

// ---------------------------------------------------------------------------
// Inventory age
// ---------------------------------------------------------------------------

/// Days since the most recent replenishment event for one (store, product).
#[derive(Clone, Debug, Serialize)]
pub struct InventoryAgeRow {
    pub store_id: String,
    pub product_id: String,
    pub latest_date: NaiveDate,
    /// `None` means no replenishment event exists in history — an
    /// insufficient-history condition, not an age of zero.
    pub last_replenishment: Option<NaiveDate>,
    pub age_days: Option<i64>,
}

// ---------------------------------------------------------------------------
// Monthly store KPIs and sell-through (report supplements)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
    /// No rating possible (e.g. turnover undefined in a no-sales month).
    Gray,
}

/// Monthly per-store KPI row with traffic-light ratings.
#[derive(Clone, Debug, Serialize)]
pub struct StoreKpiRow {
    pub store_id: String,
    pub month: MonthKey,
    pub average_stock_level: f64,
    pub stock_level_rating: TrafficLight,
    /// Fraction of snapshot rows with inventory exactly zero.
    pub stockout_rate: f64,
    pub stockout_rating: TrafficLight,
    pub inventory_turnover: Option<f64>,
    pub turnover_rating: TrafficLight,
    pub sell_through_rate: Option<f64>,
    pub sell_through_rating: TrafficLight,
}

/// Monthly sell-through rate for one region.
#[derive(Clone, Debug, Serialize)]
pub struct SellThroughRow {
    pub region_id: String,
    pub month: MonthKey,
    pub total_units_sold: f64,
    pub avg_daily_inventory: f64,
    /// `None` when sold + inventory is zero (NULLIF semantics).
    pub sell_through_pct: Option<f64>,
}
