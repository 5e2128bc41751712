//! Analytics error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors.
//!
//! Division-by-zero conditions are deliberately absent: a zero denominator in
//! any ratio (turnover, days of supply, sell-through) is a reportable
//! sentinel (`None` in the row), never an error.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A statistic was requested for a key with too few observed days.
    /// Recoverable per-key: callers may report the key with a low-confidence
    /// marker instead of aborting.
    #[error("insufficient data for {key}: {observed} observed days, {required} required")]
    InsufficientData {
        key: String,
        observed: usize,
        required: usize,
    },

    /// Two snapshots share the same (date, store, product, region). This
    /// violates the store's core invariant; the run must not guess which
    /// row is authoritative.
    #[error("duplicate snapshot for {key} on {date}")]
    DuplicateKey { key: String, date: NaiveDate },

    /// A snapshot carried a negative or non-finite numeric field, or a
    /// required identifier was missing.
    #[error("malformed snapshot for {key}: {reason}")]
    MalformedInput { key: String, reason: String },

    /// The snapshot source returned zero rows, so no anchor date exists.
    #[error("snapshot store is empty")]
    EmptyStore,

    /// CSV row failed to parse.
    #[error("CSV parse error at line {line}: {reason}")]
    CsvParse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
