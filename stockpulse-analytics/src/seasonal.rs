//! Seasonal adjustment engine.
//!
//! A seasonal factor is the ratio of a product's season-specific mean
//! demand to its overall mean demand over all history, per (product,
//! region). The factor multiplies the standard reorder point; stock is
//! then reclassified against the seasonal threshold with the same
//! four-tier scheme. An unmatched or missing season means factor 1.0 —
//! no adjustment, never an error.

use std::collections::HashMap;

use stockpulse_core::stats::RunningStats;
use stockpulse_core::Thresholds;

use crate::reorder::{classify_stock, days_of_supply};
use crate::store::SnapshotStore;
use crate::types::{ReorderRow, SeasonDemandRow, SeasonalFactorRow, SeasonalReorderRow};

/// Compute seasonal factors for every (product, region, season) observed.
pub fn factors(store: &SnapshotStore) -> Vec<SeasonalFactorRow> {
    let mut overall: HashMap<(String, String), RunningStats> = HashMap::new();
    let mut by_season: HashMap<(String, String, String), RunningStats> = HashMap::new();

    for snap in store.snapshots() {
        let product_region = (snap.product_id.clone(), snap.region_id.clone());
        overall
            .entry(product_region.clone())
            .or_default()
            .push(snap.units_sold);
        if let Some(season) = &snap.season {
            by_season
                .entry((product_region.0, product_region.1, season.clone()))
                .or_default()
                .push(snap.units_sold);
        }
    }

    let mut rows: Vec<SeasonalFactorRow> = by_season
        .into_iter()
        .map(|((product_id, region_id, season), season_stats)| {
            let overall_avg = overall
                .get(&(product_id.clone(), region_id.clone()))
                .and_then(|s| s.mean())
                .unwrap_or(0.0);
            let season_avg = season_stats.mean().unwrap_or(0.0);
            // Zero overall demand: no basis for adjustment, factor stays 1.
            let factor = if overall_avg > 0.0 {
                season_avg / overall_avg
            } else {
                1.0
            };
            SeasonalFactorRow {
                product_id,
                region_id,
                season,
                season_avg_units_sold: season_avg,
                overall_avg_units_sold: overall_avg,
                factor,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        (&a.product_id, &a.region_id, &a.season).cmp(&(&b.product_id, &b.region_id, &b.season))
    });
    rows
}

/// Apply seasonal factors to reorder rows. The factor used for a key is
/// the one matching its latest snapshot's season tag.
pub fn apply(
    reorder_rows: &[ReorderRow],
    factor_rows: &[SeasonalFactorRow],
    store: &SnapshotStore,
    thresholds: &Thresholds,
) -> Vec<SeasonalReorderRow> {
    let factor_index: HashMap<(&str, &str, &str), f64> = factor_rows
        .iter()
        .map(|f| {
            (
                (f.product_id.as_str(), f.region_id.as_str(), f.season.as_str()),
                f.factor,
            )
        })
        .collect();

    reorder_rows
        .iter()
        .map(|row| {
            let season = store.latest(&row.key).and_then(|s| s.season.clone());
            let factor = season
                .as_deref()
                .and_then(|s| {
                    factor_index
                        .get(&(row.key.product_id.as_str(), row.key.region_id.as_str(), s))
                        .copied()
                })
                .unwrap_or(1.0);
            let seasonal_reorder_point = row.reorder_point * factor;
            SeasonalReorderRow {
                key: row.key.clone(),
                season,
                seasonal_factor: factor,
                current_stock: row.current_stock,
                standard_reorder_point: row.reorder_point,
                seasonal_reorder_point,
                days_of_supply: days_of_supply(row.current_stock, row.avg_daily_demand * factor),
                status: classify_stock(
                    row.current_stock,
                    seasonal_reorder_point,
                    thresholds.near_reorder_multiplier,
                ),
            }
        })
        .collect()
}

/// Average demand per (category, season) over all history.
pub fn season_demand_profile(store: &SnapshotStore) -> Vec<SeasonDemandRow> {
    let mut by_category_season: HashMap<(String, String), RunningStats> = HashMap::new();
    for snap in store.snapshots() {
        if let Some(season) = &snap.season {
            by_category_season
                .entry((snap.category.clone(), season.clone()))
                .or_default()
                .push(snap.units_sold);
        }
    }

    let mut rows: Vec<SeasonDemandRow> = by_category_season
        .into_iter()
        .map(|((category, season), stats)| SeasonDemandRow {
            avg_units_sold: stats.mean().unwrap_or(0.0),
            category,
            season,
        })
        .collect();
    rows.sort_by(|a, b| (&a.category, &a.season).cmp(&(&b.category, &b.season)));
    rows
}
