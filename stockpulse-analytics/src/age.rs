//! Inventory age: days since the most recent replenishment event.
//!
//! A replenishment event is a day whose end-of-day inventory exceeds the
//! previous day's by more than the configured jump factor (default 20%).
//! Age is measured from the key's latest observed date. A key with no
//! event anywhere in history has an undefined age — an insufficient-
//! history condition, never zero.
//!
//! Keys here are (store, product): daily inventory is summed across
//! regions first, which is a no-op for 1:1 store-region data.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use stockpulse_core::Thresholds;

use crate::store::SnapshotStore;
use crate::types::InventoryAgeRow;

/// Compute inventory age for every (store, product).
pub fn compute(store: &SnapshotStore, thresholds: &Thresholds) -> Vec<InventoryAgeRow> {
    store
        .rows_by_store_product()
        .into_iter()
        .map(|((store_id, product_id), rows)| {
            // Collapse regions: one inventory level per date, date-ascending.
            let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
            for snap in rows {
                *daily.entry(snap.date).or_default() += snap.inventory_level;
            }

            let mut last_replenishment: Option<NaiveDate> = None;
            let mut prev: Option<f64> = None;
            let mut latest_date = None;
            for (&date, &level) in &daily {
                if let Some(prev_level) = prev {
                    if level > prev_level * thresholds.replenishment_jump {
                        last_replenishment = Some(date);
                    }
                }
                prev = Some(level);
                latest_date = Some(date);
            }

            // daily is non-empty for every group the store yields.
            let latest_date = latest_date.unwrap_or_default();
            InventoryAgeRow {
                store_id,
                product_id,
                latest_date,
                last_replenishment,
                age_days: last_replenishment
                    .map(|event| (latest_date - event).num_days()),
            }
        })
        .collect()
}
