//! Time windows over the snapshot history.
//!
//! Every relative window is anchored to the *dataset's* maximum observed
//! date, never the system clock. That keeps a run over a frozen snapshot
//! set replayable bit-for-bit.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month bucket, ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The immediately preceding calendar month, crossing year boundaries.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            MonthKey {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A time window evaluated against an anchor date (the dataset max date).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    /// Every observed day.
    AllTime,
    /// Inclusive absolute range.
    Absolute { start: NaiveDate, end: NaiveDate },
    /// The `days` most recent days ending at the anchor, inclusive.
    TrailingDays { days: u32 },
    /// The window `(anchor - months, anchor]`.
    TrailingMonths { months: u32 },
    /// One calendar month bucket.
    CalendarMonth(MonthKey),
    /// One ISO calendar week bucket.
    CalendarWeek { year: i32, week: u32 },
}

impl TimeWindow {
    /// Whether `date` falls inside this window, relative to `anchor`.
    pub fn contains(&self, date: NaiveDate, anchor: NaiveDate) -> bool {
        match *self {
            TimeWindow::AllTime => true,
            TimeWindow::Absolute { start, end } => date >= start && date <= end,
            TimeWindow::TrailingDays { days } => {
                if days == 0 {
                    return false;
                }
                let start = anchor - Days::new(u64::from(days) - 1);
                date >= start && date <= anchor
            }
            TimeWindow::TrailingMonths { months } => {
                let start_exclusive = anchor - Months::new(months);
                date > start_exclusive && date <= anchor
            }
            TimeWindow::CalendarMonth(month) => MonthKey::from_date(date) == month,
            TimeWindow::CalendarWeek { year, week } => {
                let iso = date.iso_week();
                iso.year() == year && iso.week() == week
            }
        }
    }
}
