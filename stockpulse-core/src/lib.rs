//! Core layer for inventory health analytics.
//!
//! Contains the snapshot data model, descriptive statistics, time window
//! arithmetic, the centralized threshold configuration, and the error
//! taxonomy. Everything here is pure and synchronous; the analytics engines
//! in `stockpulse-analytics` build on these primitives.

pub mod error;
pub mod snapshot;
pub mod stats;
pub mod thresholds;
pub mod window;

pub use error::{AnalyticsError, AnalyticsResult};
pub use snapshot::{Snapshot, SnapshotKey};
pub use thresholds::Thresholds;
pub use window::{MonthKey, TimeWindow};
