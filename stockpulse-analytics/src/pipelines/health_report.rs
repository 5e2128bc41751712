//! The full inventory health report pipeline.
//!
//! Wires every analytics engine over one snapshot store and produces a
//! single deterministic report. Pipeline flow:
//!
//! 1. Fetch snapshots through the source seam and build the store
//!    (validation, duplicate detection, latest-per-key index)
//! 2. Reorder point engine, then seasonal adjustment over its output
//! 3. Turnover (monthly + rolling with stock adjustments)
//! 4. Trend classification and vote summaries
//! 5. Consistency detection
//! 6. Inventory age
//! 7. Monthly store KPIs and regional sell-through
//! 8. Uniform observation-floor filtering and severity ordering
//!
//! Engines with no data dependency between them are independent per key;
//! within each engine the per-key work runs on rayon. Re-running over the
//! same snapshots reproduces the report bit-for-bit: every window anchors
//! to the dataset max date and nothing here reads the system clock.

use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use stockpulse_core::error::AnalyticsResult;
use stockpulse_core::Thresholds;

use crate::filter::{MinObservationFilter, RowFilter};
use crate::selector::{Selector, StockStatusSelector};
use crate::source::SnapshotSource;
use crate::store::SnapshotStore;
use crate::types::{
    ConsistencyRow, InsufficientDataRow, InventoryAgeRow, MonthlyTurnoverRow, ReorderRow,
    RollingTurnoverRow, SeasonDemandRow, SeasonalFactorRow, SeasonalReorderRow, SellThroughRow,
    StoreKpiRow, TrendSummaryRow, TrendYearRow,
};
use crate::{age, consistency, kpi, reorder, seasonal, trend, turnover};

/// Shape of the dataset the report was computed over.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetSummary {
    pub snapshot_count: usize,
    pub key_count: usize,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

/// The complete report. Purely a function of the input snapshots and the
/// thresholds.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub summary: DatasetSummary,
    pub reorder: Vec<ReorderRow>,
    pub reorder_insufficient: Vec<InsufficientDataRow>,
    pub seasonal_reorder: Vec<SeasonalReorderRow>,
    pub seasonal_factors: Vec<SeasonalFactorRow>,
    pub season_demand: Vec<SeasonDemandRow>,
    pub turnover_monthly: Vec<MonthlyTurnoverRow>,
    pub turnover_rolling: Vec<RollingTurnoverRow>,
    pub trend_years: Vec<TrendYearRow>,
    pub trend_summary: Vec<TrendSummaryRow>,
    pub consistency: Vec<ConsistencyRow>,
    pub consistency_insufficient: Vec<InsufficientDataRow>,
    pub inventory_age: Vec<InventoryAgeRow>,
    pub store_kpis: Vec<StoreKpiRow>,
    pub sell_through: Vec<SellThroughRow>,
}

/// Runs the full report with one set of thresholds.
pub struct HealthReportPipeline {
    thresholds: Thresholds,
}

impl HealthReportPipeline {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn with_defaults() -> Self {
        Self::new(Thresholds::default())
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Fetch snapshots from the source and compute the full report.
    pub async fn run(&self, source: &dyn SnapshotSource) -> AnalyticsResult<HealthReport> {
        info!("fetching snapshots from {}", source.name());
        let snapshots = source.fetch_all().await?;
        let store = SnapshotStore::from_snapshots(snapshots)?;
        self.run_on_store(&store)
    }

    /// Compute the report over an already-built store.
    pub fn run_on_store(&self, store: &SnapshotStore) -> AnalyticsResult<HealthReport> {
        let t = &self.thresholds;
        let floor_filter = MinObservationFilter::new(t.min_observation_days);

        let reorder_result = reorder::compute(store, t);
        let filtered = floor_filter.filter(reorder_result.rows);
        let mut reorder_insufficient = reorder_result.no_history;
        reorder_insufficient.extend(filtered.excluded.into_iter().map(|row| {
            InsufficientDataRow {
                key: row.key,
                observed_days: row.observed_days,
                required_days: t.min_observation_days,
            }
        }));
        reorder_insufficient.sort_by(|a, b| a.key.cmp(&b.key));
        let reorder_rows = StockStatusSelector.sort(filtered.kept);

        // Seasonal adjustment consumes the reorder output; it runs after,
        // over the same kept keys.
        let seasonal_factors = seasonal::factors(store);
        let seasonal_rows = StockStatusSelector.sort(seasonal::apply(
            &reorder_rows,
            &seasonal_factors,
            store,
            t,
        ));

        let consistency_filtered = floor_filter.filter(consistency::compute(store, t));
        let consistency_insufficient = consistency_filtered
            .excluded
            .into_iter()
            .map(|row| InsufficientDataRow {
                key: row.key,
                observed_days: row.observed_days,
                required_days: t.min_observation_days,
            })
            .collect();

        let trend_years = trend::classify_years(store, t);
        let mut trend_summary = trend::summarize(&trend_years);
        // Worst-first for the report: Mostly Downward, then Mixed.
        trend_summary.sort_by(|a, b| {
            (a.label, &a.store_id, &a.product_id, a.calendar_month).cmp(&(
                b.label,
                &b.store_id,
                &b.product_id,
                b.calendar_month,
            ))
        });

        let report = HealthReport {
            summary: DatasetSummary {
                snapshot_count: store.len(),
                key_count: store.key_count(),
                min_date: store.min_date(),
                max_date: store.max_date(),
            },
            reorder: reorder_rows,
            reorder_insufficient,
            seasonal_reorder: seasonal_rows,
            seasonal_factors,
            season_demand: seasonal::season_demand_profile(store),
            turnover_monthly: turnover::compute_monthly(store, t),
            turnover_rolling: turnover::compute_rolling(store, t),
            trend_years,
            trend_summary,
            consistency: consistency_filtered.kept,
            consistency_insufficient,
            inventory_age: age::compute(store, t),
            store_kpis: kpi::store_kpis(store, t),
            sell_through: kpi::sell_through_by_region(store),
        };

        info!(
            "health report: {} keys, {} reorder rows ({} insufficient), {} trend summaries",
            report.summary.key_count,
            report.reorder.len(),
            report.reorder_insufficient.len(),
            report.trend_summary.len()
        );

        Ok(report)
    }
}
