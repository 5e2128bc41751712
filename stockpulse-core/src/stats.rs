//! Shared descriptive statistics.
//!
//! All standard deviations in this workspace are **population** standard
//! deviations (divide by N, not N-1), the same convention as SQL's
//! `STDDEV()`. Zero-sale days are included in every series; they are
//! demand signal, not missing data.

/// Streaming accumulator for mean and population standard deviation.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunningStats {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// `None` for an empty series — an empty mean is an insufficient-data
    /// condition for the caller to surface, never a silent zero.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    /// Population standard deviation. `None` for an empty series.
    pub fn stddev(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        // Guard the subtraction against float noise going slightly negative.
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        Some(variance.sqrt())
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::default();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// Mean of a slice, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    values.iter().copied().collect::<RunningStats>().mean()
}

/// Population standard deviation of a slice, `None` when empty.
pub fn stddev_pop(values: &[f64]) -> Option<f64> {
    values.iter().copied().collect::<RunningStats>().stddev()
}
