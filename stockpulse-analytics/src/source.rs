//! Snapshot source seam.
//!
//! The analytics layer reads snapshots through this trait; the engines
//! themselves never perform I/O mid-computation.

use async_trait::async_trait;
use chrono::NaiveDate;

use stockpulse_core::error::AnalyticsResult;
use stockpulse_core::snapshot::Snapshot;

use crate::snapshot_loader;
use crate::util;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch every snapshot as an ordered sequence of records.
    async fn fetch_all(&self) -> AnalyticsResult<Vec<Snapshot>>;

    /// The maximum date across all snapshots, if any. The default fetches
    /// and scans; backends with an index should override.
    async fn max_date(&self) -> AnalyticsResult<Option<NaiveDate>> {
        let snapshots = self.fetch_all().await?;
        Ok(snapshots.iter().map(|s| s.date).max())
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Snapshot source backed by a CSV file on disk.
pub struct CsvFileSource {
    path: String,
}

impl CsvFileSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for CsvFileSource {
    async fn fetch_all(&self) -> AnalyticsResult<Vec<Snapshot>> {
        snapshot_loader::load_snapshots_file(&self.path)
    }
}

/// In-memory source, used by tests and embedders that already hold records.
pub struct VecSource {
    snapshots: Vec<Snapshot>,
}

impl VecSource {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }
}

#[async_trait]
impl SnapshotSource for VecSource {
    async fn fetch_all(&self) -> AnalyticsResult<Vec<Snapshot>> {
        Ok(self.snapshots.clone())
    }
}
