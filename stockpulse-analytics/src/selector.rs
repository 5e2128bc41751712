//! Output ordering.
//!
//! Report rows sort by classification severity, worst first, so the top of
//! every table is what an operations reader should look at next.

use crate::types::{ReorderRow, SeasonalReorderRow, StockStatus};

/// Selectors order rows by a severity score in descending order.
pub trait Selector<R>: Send + Sync {
    /// Extract the severity score from a row. Higher sorts first.
    fn score(&self, row: &R) -> f64;

    /// Sort rows by score descending.
    ///
    /// NaN scores are pushed to the end of the list so they never appear
    /// as top rows. This guards against division-by-zero or missing data
    /// producing garbage at the top of the report.
    fn sort(&self, rows: Vec<R>) -> Vec<R> {
        let mut sorted = rows;
        sorted.sort_by(|a, b| {
            let sa = self.score(a);
            let sb = self.score(b);
            match (sa.is_nan(), sb.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal),
            }
        });
        sorted
    }
}

fn status_rank(status: StockStatus) -> f64 {
    match status {
        StockStatus::OutOfStock => 3.0,
        StockStatus::BelowReorderPoint => 2.0,
        StockStatus::NearReorderPoint => 1.0,
        StockStatus::AdequateStock => 0.0,
    }
}

/// Fraction of the reorder point the current stock is short by, clamped to
/// [0, 1) so it only breaks ties within a status tier.
fn shortfall_fraction(current_stock: f64, reorder_point: f64) -> f64 {
    if reorder_point <= 0.0 {
        return 0.0;
    }
    ((reorder_point - current_stock) / reorder_point).clamp(0.0, 0.999)
}

/// Orders reorder rows worst-first: status tier, then relative shortfall.
pub struct StockStatusSelector;

impl Selector<ReorderRow> for StockStatusSelector {
    fn score(&self, row: &ReorderRow) -> f64 {
        status_rank(row.status) + shortfall_fraction(row.current_stock, row.reorder_point)
    }
}

impl Selector<SeasonalReorderRow> for StockStatusSelector {
    fn score(&self, row: &SeasonalReorderRow) -> f64 {
        status_rank(row.status)
            + shortfall_fraction(row.current_stock, row.seasonal_reorder_point)
    }
}
