//! Daily inventory snapshot records.
//!
//! One `Snapshot` per (date, store, product, region): units on hand at end
//! of day, that day's sales and orders, and the categorical tags observed
//! on the day. Snapshots are immutable input — the analytics layer never
//! mutates or deletes them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// The full grouping key a snapshot is unique under (together with its date).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey {
    pub store_id: String,
    pub product_id: String,
    pub region_id: String,
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.store_id, self.product_id, self.region_id)
    }
}

/// One observed day for one (store, product, region).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub store_id: String,
    pub product_id: String,
    pub region_id: String,
    /// Category is functionally dependent on `product_id`.
    pub category: String,
    /// Units on hand at end of day. Non-negative.
    pub inventory_level: f64,
    /// Units sold that day. Non-negative. Zero-sale days are real demand
    /// signal and participate in every statistic.
    pub units_sold: f64,
    /// Units ordered from the supplier that day. Non-negative.
    pub units_ordered: f64,
    pub current_price: f64,
    pub demand_forecast: f64,
    pub season: Option<String>,
    pub weather: Option<String>,
    pub promotion: Option<String>,
}

impl Snapshot {
    pub fn key(&self) -> SnapshotKey {
        SnapshotKey {
            store_id: self.store_id.clone(),
            product_id: self.product_id.clone(),
            region_id: self.region_id.clone(),
        }
    }

    /// Validation at the analytics boundary. Negative or non-finite
    /// quantities would silently poison every downstream mean and stddev,
    /// so they are rejected here even when an upstream ETL step already
    /// screened them.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.store_id.is_empty() || self.product_id.is_empty() || self.region_id.is_empty() {
            return Err(AnalyticsError::MalformedInput {
                key: self.key().to_string(),
                reason: "missing store/product/region identifier".into(),
            });
        }
        for (name, value) in [
            ("inventory_level", self.inventory_level),
            ("units_sold", self.units_sold),
            ("units_ordered", self.units_ordered),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalyticsError::MalformedInput {
                    key: self.key().to_string(),
                    reason: format!("{name} is {value}, expected a non-negative number"),
                });
            }
        }
        for (name, value) in [
            ("current_price", self.current_price),
            ("demand_forecast", self.demand_forecast),
        ] {
            if !value.is_finite() {
                return Err(AnalyticsError::MalformedInput {
                    key: self.key().to_string(),
                    reason: format!("{name} is not finite"),
                });
            }
        }
        Ok(())
    }
}
