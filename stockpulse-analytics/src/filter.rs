//! Row filters partition report rows into kept and excluded sets.
//!
//! Excluded rows are returned to the caller, not discarded: the report
//! surfaces which keys fell below the observation floor and why.

use crate::util;

/// Result of a filter pass.
pub struct FilterResult<R> {
    pub kept: Vec<R>,
    pub excluded: Vec<R>,
}

pub trait RowFilter<R>: Send + Sync {
    /// Partition rows into kept and excluded.
    fn filter(&self, rows: Vec<R>) -> FilterResult<R>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}

/// Rows that expose how many days of history backed their statistics.
pub trait HasObservedDays {
    fn observed_days(&self) -> usize;
}

/// The uniform minimum-observation filter. One floor, applied the same
/// way to every statistic that opts in, so no engine quietly rates a key
/// the others refused to.
pub struct MinObservationFilter {
    pub floor: usize,
}

impl MinObservationFilter {
    pub fn new(floor: usize) -> Self {
        Self { floor }
    }
}

impl<R: HasObservedDays + Send> RowFilter<R> for MinObservationFilter {
    fn filter(&self, rows: Vec<R>) -> FilterResult<R> {
        let (kept, excluded) = rows
            .into_iter()
            .partition(|row| row.observed_days() >= self.floor);
        FilterResult { kept, excluded }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        days: usize,
    }

    impl HasObservedDays for Row {
        fn observed_days(&self) -> usize {
            self.days
        }
    }

    #[test]
    fn partitions_on_the_floor_inclusively() {
        let filter = MinObservationFilter::new(7);
        let result = filter.filter(vec![Row { days: 6 }, Row { days: 7 }, Row { days: 8 }]);
        assert_eq!(result.kept.len(), 2);
        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].days, 6);
    }

    #[test]
    fn zero_floor_keeps_everything() {
        let filter = MinObservationFilter::new(0);
        let result = filter.filter(vec![Row { days: 0 }]);
        assert_eq!(result.kept.len(), 1);
        assert!(result.excluded.is_empty());
    }
}
