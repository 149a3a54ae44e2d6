//! Quartile-classification fallback engine
//!
//! A degraded backend for environments where permutation inference is not
//! wanted: units in the upper attribute quartile become high-high clusters,
//! units in the lower quartile low-low clusters, everything else noise. No
//! spatial structure is consulted, so lags are zero and p-values are
//! sentinels chosen to keep the label/threshold invariant intact.

use crate::algorithm::classify::{ClusterLabel, LocalStatistic, Quadrant};
use crate::algorithm::pipeline::{
    AnalysisConfig, AnalysisOutcome, BatchFlags, ClusterEngine,
};
use crate::io::error::{AnalysisError, Result};
use crate::math::stats::{mean, quantile};
use crate::spatial::geometry::SpatialUnit;

/// Fallback engine classifying by attribute quartiles alone
#[derive(Debug, Clone, Copy, Default)]
pub struct QuartileEngine;

impl QuartileEngine {
    /// Create the fallback engine
    pub const fn new() -> Self {
        Self
    }
}

impl ClusterEngine for QuartileEngine {
    fn compute_clusters(
        &self,
        units: &[SpatialUnit],
        _config: &AnalysisConfig,
    ) -> Result<AnalysisOutcome> {
        if units.len() < 2 {
            return Err(AnalysisError::InsufficientUnits {
                found: units.len(),
            });
        }

        let values: Vec<f64> = units.iter().map(|u| u.attribute_value).collect();
        let batch_mean = mean(&values).unwrap_or(0.0);
        let lower = quantile(&values, 0.25).unwrap_or(batch_mean);
        let upper = quantile(&values, 0.75).unwrap_or(batch_mean);
        let constant_attribute = values
            .iter()
            .all(|&v| (v - batch_mean).abs() <= f64::EPSILON * batch_mean.abs().max(1.0));

        let statistics = units
            .iter()
            .map(|unit| {
                let z = unit.attribute_value - batch_mean;
                // Quartile membership must agree with the deviation sign so
                // labelled clusters keep the usual sign guarantees
                let label = if constant_attribute {
                    ClusterLabel::NotSignificant
                } else if unit.attribute_value >= upper && z > 0.0 {
                    ClusterLabel::HighHigh
                } else if unit.attribute_value <= lower && z <= 0.0 {
                    ClusterLabel::LowLow
                } else {
                    ClusterLabel::NotSignificant
                };
                let p_value = if label.is_significant() { 0.0 } else { 1.0 };
                LocalStatistic {
                    unit_id: unit.id,
                    attribute_value: unit.attribute_value,
                    z_deviation: z,
                    lag: 0.0,
                    local_i: 0.0,
                    p_value,
                    quadrant: Quadrant::from_signs(z, 0.0),
                    label,
                }
            })
            .collect();

        Ok(AnalysisOutcome {
            statistics,
            flags: BatchFlags {
                constant_attribute,
                degenerate_weights: false,
            },
        })
    }
}
