//! Inventory health analytics engines.
//!
//! Consumes a read-only store of daily per-store/per-product snapshots and
//! produces classified, auditable report rows: stock status against reorder
//! points, seasonal adjustments, turnover and movement, directional sales
//! trends, supplier consistency flags, inventory age, and monthly store
//! KPIs. All relative windows anchor to the dataset's max date, so a run
//! over a frozen dataset is reproducible bit-for-bit.

pub mod age;
pub mod aggregator;
pub mod consistency;
pub mod filter;
pub mod kpi;
pub mod pipelines;
pub mod reorder;
pub mod seasonal;
pub mod selector;
pub mod snapshot_loader;
pub mod source;
pub mod store;
pub mod trend;
pub mod turnover;
pub mod types;
pub mod util;
