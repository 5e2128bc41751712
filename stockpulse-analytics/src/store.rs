//! In-memory snapshot store.
//!
//! Read-only once built. Construction validates every row, rejects
//! duplicate (date, store, product, region) tuples as fatal, and builds the
//! shared lookup structures the engines need: the dataset max date, a
//! latest-snapshot-per-key index, and per-key date-sorted views. The
//! latest-per-key index is built exactly once per run; consumers never
//! re-derive it with their own max-date scans.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use log::debug;

use stockpulse_core::error::{AnalyticsError, AnalyticsResult};
use stockpulse_core::snapshot::{Snapshot, SnapshotKey};

#[derive(Debug)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
    max_date: NaiveDate,
    min_date: NaiveDate,
    /// Index of the row with max(date) per full key. Ties are impossible
    /// after duplicate detection.
    latest: HashMap<SnapshotKey, usize>,
    /// Per-key row indices, sorted by date. BTreeMap keeps key iteration
    /// deterministic.
    by_key: BTreeMap<SnapshotKey, Vec<usize>>,
}

impl SnapshotStore {
    /// Build the store from raw snapshots, validating each and rejecting
    /// duplicates.
    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> AnalyticsResult<Self> {
        if snapshots.is_empty() {
            return Err(AnalyticsError::EmptyStore);
        }

        let mut by_key: BTreeMap<SnapshotKey, Vec<usize>> = BTreeMap::new();
        let mut seen: HashMap<(SnapshotKey, NaiveDate), usize> = HashMap::new();
        let mut max_date = snapshots[0].date;
        let mut min_date = snapshots[0].date;

        for (idx, snap) in snapshots.iter().enumerate() {
            snap.validate()?;
            let key = snap.key();
            if seen.insert((key.clone(), snap.date), idx).is_some() {
                return Err(AnalyticsError::DuplicateKey {
                    key: key.to_string(),
                    date: snap.date,
                });
            }
            max_date = max_date.max(snap.date);
            min_date = min_date.min(snap.date);
            by_key.entry(key).or_default().push(idx);
        }

        let mut latest = HashMap::with_capacity(by_key.len());
        for (key, indices) in by_key.iter_mut() {
            indices.sort_by_key(|&i| snapshots[i].date);
            // Last after sort is the unique max-date row for this key.
            if let Some(&last) = indices.last() {
                latest.insert(key.clone(), last);
            }
        }

        debug!(
            "snapshot store: {} rows, {} keys, {} .. {}",
            snapshots.len(),
            by_key.len(),
            min_date,
            max_date
        );

        Ok(SnapshotStore {
            snapshots,
            max_date,
            min_date,
            latest,
            by_key,
        })
    }

    /// The dataset's maximum observed date — the anchor for every trailing
    /// window. Never the system clock.
    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Distinct full keys in deterministic order.
    pub fn keys(&self) -> impl Iterator<Item = &SnapshotKey> {
        self.by_key.keys()
    }

    pub fn key_count(&self) -> usize {
        self.by_key.len()
    }

    /// All rows for a key, date-ascending.
    pub fn rows_for(&self, key: &SnapshotKey) -> impl Iterator<Item = &Snapshot> {
        self.by_key
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.snapshots[i])
    }

    /// The single most recent row for a key, from the prebuilt index.
    pub fn latest(&self, key: &SnapshotKey) -> Option<&Snapshot> {
        self.latest.get(key).map(|&i| &self.snapshots[i])
    }

    /// Rows grouped by (store, product) across regions, date-ascending
    /// within each group. Used where a metric is keyed coarser than the
    /// snapshot uniqueness tuple (e.g. inventory age).
    pub fn rows_by_store_product(&self) -> BTreeMap<(String, String), Vec<&Snapshot>> {
        let mut groups: BTreeMap<(String, String), Vec<&Snapshot>> = BTreeMap::new();
        for snap in &self.snapshots {
            groups
                .entry((snap.store_id.clone(), snap.product_id.clone()))
                .or_default()
                .push(snap);
        }
        for rows in groups.values_mut() {
            rows.sort_by_key(|s| s.date);
        }
        groups
    }
}
