//! Batch-level summary statistics over analysis outcomes
//!
//! Aggregates one batch's per-unit statistics into the figures a dashboard
//! or report front-end displays: attribute distribution, cluster counts,
//! significance share, and the global Moran statistic.

use crate::algorithm::classify::ClusterLabel;
use crate::algorithm::pipeline::AnalysisOutcome;
use crate::math::stats::DistributionSummary;
use crate::spatial::weights::WeightsMatrix;
use ndarray::Array1;

/// Aggregate figures for one analysis batch
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Number of units in the batch
    pub unit_count: usize,
    /// Units whose label marks a significant cluster or outlier
    pub significant_count: usize,
    /// Significant units as a fraction of the batch
    pub significant_share: f64,
    /// Distribution of the analyzed attribute
    pub attribute: Option<DistributionSummary>,
    /// Count per cluster label, in display order
    pub label_counts: Vec<(ClusterLabel, usize)>,
    /// Mean of the per-unit local Moran statistics
    ///
    /// Under row-standardized weights with no isolates this equals the
    /// global Moran's I computed directly from the weights.
    pub mean_local_i: f64,
}

/// Summarize one analysis outcome
pub fn summarize(outcome: &AnalysisOutcome) -> BatchSummary {
    let unit_count = outcome.statistics.len();
    let significant_count = outcome
        .statistics
        .iter()
        .filter(|s| s.label.is_significant())
        .count();
    let significant_share = if unit_count > 0 {
        significant_count as f64 / unit_count as f64
    } else {
        0.0
    };

    let attribute_values: Vec<f64> = outcome
        .statistics
        .iter()
        .map(|s| s.attribute_value)
        .collect();
    let attribute = DistributionSummary::from_values(&attribute_values);

    let label_counts = ClusterLabel::ALL
        .iter()
        .map(|&label| {
            let count = outcome
                .statistics
                .iter()
                .filter(|s| s.label == label)
                .count();
            (label, count)
        })
        .collect();

    let mean_local_i = if unit_count > 0 {
        outcome.statistics.iter().map(|s| s.local_i).sum::<f64>() / unit_count as f64
    } else {
        0.0
    };

    BatchSummary {
        unit_count,
        significant_count,
        significant_share,
        attribute,
        label_counts,
        mean_local_i,
    }
}

/// Global Moran's I computed directly from weights and values
///
/// `I = (N / S0) · Σ_ij w_ij z_i z_j / Σ z²` where `S0` is the total weight
/// mass. Returns zero for constant attribute vectors or empty weights.
pub fn global_moran(weights: &WeightsMatrix, values: &Array1<f64>) -> f64 {
    let n = values.len();
    if n == 0 || n != weights.unit_count() {
        return 0.0;
    }

    let mean = values.sum() / n as f64;
    let deviations = values.mapv(|v| v - mean);
    let sum_sq: f64 = deviations.iter().map(|z| z * z).sum();
    if sum_sq == 0.0 {
        return 0.0;
    }

    let mut s0 = 0.0;
    let mut cross = 0.0;
    for i in 0..n {
        let z_i = deviations.get(i).copied().unwrap_or(0.0);
        for &(j, w) in weights.row(i) {
            let z_j = deviations.get(j).copied().unwrap_or(0.0);
            s0 += w;
            cross = (w * z_i).mul_add(z_j, cross);
        }
    }
    if s0 == 0.0 {
        return 0.0;
    }

    (n as f64 / s0) * (cross / sum_sq)
}
