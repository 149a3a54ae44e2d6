//! Summary statistics over numeric slices
//!
//! Generic over the float width so callers can summarize attribute vectors
//! without converting them first. All functions return `None` on empty input
//! rather than producing a sentinel value.

use num_traits::Float;

/// Arithmetic mean
pub fn mean<F: Float>(values: &[F]) -> Option<F> {
    if values.is_empty() {
        return None;
    }
    let n = F::from(values.len())?;
    let sum = values.iter().fold(F::zero(), |acc, &v| acc + v);
    Some(sum / n)
}

/// Population standard deviation
pub fn std_dev<F: Float>(values: &[F]) -> Option<F> {
    let m = mean(values)?;
    let n = F::from(values.len())?;
    let sum_sq = values
        .iter()
        .fold(F::zero(), |acc, &v| acc + (v - m) * (v - m));
    Some((sum_sq / n).sqrt())
}

/// Quantile with linear interpolation between order statistics
///
/// `q` is clamped to `[0, 1]`; `quantile(values, 0.5)` is the median.
pub fn quantile<F: Float>(values: &[F], q: f64) -> Option<F> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let clamped = q.clamp(0.0, 1.0);
    let position = clamped * (sorted.len() - 1) as f64;
    let lower_index = position.floor() as usize;
    let upper_index = position.ceil() as usize;
    let lower = sorted.get(lower_index).copied()?;
    let upper = sorted.get(upper_index).copied()?;
    let fraction = F::from(position - position.floor())?;
    Some(lower + fraction * (upper - lower))
}

/// Median (the 0.5 quantile)
pub fn median<F: Float>(values: &[F]) -> Option<F> {
    quantile(values, 0.5)
}

/// Five-number style summary of one numeric distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl DistributionSummary {
    /// Summarize a slice of values; `None` when the slice is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean_value = mean(values)?;
        let median_value = median(values)?;
        let std_value = std_dev(values)?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            mean: mean_value,
            median: median_value,
            std_dev: std_value,
            min,
            max,
        })
    }
}
