//! Column statistics
//!
//! Mean, median and sample standard deviation over the numeric values of a
//! view. Degenerate inputs produce NaN instead of failing.

use serde::Serialize;

/// Summary of one numeric column
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ColumnStats {
    /// Number of values the statistics were computed from
    pub count: usize,
    /// NaN when `count == 0`
    pub mean: f64,
    /// NaN when `count == 0`
    pub median: f64,
    /// Sample standard deviation (N - 1 denominator); NaN when `count < 2`
    pub stddev: f64,
}

impl ColumnStats {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            median: median(values),
            stddev: sample_stddev(values),
        }
    }

    /// Whether the standard deviation is defined for this sample
    pub fn has_stddev(&self) -> bool {
        !self.stddev.is_nan()
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, or the average of the two middle values for even counts
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
