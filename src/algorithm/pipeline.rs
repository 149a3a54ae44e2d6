//! End-to-end analysis pipeline and engine strategies
//!
//! A batch of spatial units flows through adjacency construction, row
//! standardization, the local Moran engine, the permutation tester, and the
//! classifier. The whole pipeline is a pure function of its inputs: no step
//! touches external state, so callers may cache outputs keyed by a content
//! hash of the inputs and re-invoke freely.

use crate::algorithm::classify::{LocalStatistic, classify};
use crate::algorithm::moran::local_moran;
use crate::algorithm::permutation::{
    CancelToken, PermutationConfig, ProgressSink, SilentProgress, conditional_permutation,
};
use crate::io::configuration::{DEFAULT_NEIGHBOR_COUNT, DEFAULT_SIGNIFICANCE_THRESHOLD};
use crate::io::error::Result;
use crate::spatial::adjacency::{ContiguityRule, build_adjacency};
use crate::spatial::geometry::SpatialUnit;
use crate::spatial::weights::WeightsMatrix;
use ndarray::Array1;

/// Parameters controlling one analysis batch
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    /// Neighbor-detection rule for the weight builder
    pub contiguity: ContiguityRule,
    /// Permutation-test parameters
    pub permutations: PermutationConfig,
    /// p-value threshold separating clusters from noise
    pub significance_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            contiguity: ContiguityRule::KNearest {
                k: DEFAULT_NEIGHBOR_COUNT,
            },
            permutations: PermutationConfig::default(),
            significance_threshold: DEFAULT_SIGNIFICANCE_THRESHOLD,
        }
    }
}

/// Degenerate batch conditions surfaced alongside the results
///
/// These are defined states rather than failures; callers inspect the flags
/// instead of finding sentinel numbers swallowed into the statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchFlags {
    /// The attribute vector was constant, so every local statistic is zero
    pub constant_attribute: bool,
    /// Every unit was an isolate, so inference was skipped batch-wide
    pub degenerate_weights: bool,
}

/// Result of one analysis batch: per-unit statistics plus batch flags
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// One row per input unit, in input order
    pub statistics: Vec<LocalStatistic>,
    /// Degenerate conditions observed while computing the batch
    pub flags: BatchFlags,
}

/// Strategy interface over cluster computation backends
///
/// The full LISA engine and the quartile fallback implement the same
/// contract, so callers select a backend once and the rest of the program is
/// indifferent to which one runs.
pub trait ClusterEngine {
    /// Compute per-unit cluster statistics for one batch
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is too small, the contiguity rule does
    /// not fit the geometries, or the computation is cancelled.
    fn compute_clusters(
        &self,
        units: &[SpatialUnit],
        config: &AnalysisConfig,
    ) -> Result<AnalysisOutcome>;
}

/// Full local-Moran engine with conditional permutation inference
#[derive(Debug, Clone, Default)]
pub struct LisaEngine {
    cancel: CancelToken,
}

impl LisaEngine {
    /// Create an engine with a fresh cancellation token
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine observing an externally held cancellation token
    pub const fn with_cancel_token(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    /// Run the pipeline, reporting per-unit completion to `progress`
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is too small, the contiguity rule does
    /// not fit the geometries, or the computation is cancelled.
    pub fn compute_with_progress(
        &self,
        units: &[SpatialUnit],
        config: &AnalysisConfig,
        progress: &dyn ProgressSink,
    ) -> Result<AnalysisOutcome> {
        let graph = build_adjacency(units, &config.contiguity)?;
        let weights = WeightsMatrix::binary(&graph).row_standardize()?;
        let values: Array1<f64> = units.iter().map(|u| u.attribute_value).collect();
        let components = local_moran(&weights, &values)?;

        // All-isolate batches degrade to a defined sentinel instead of failing
        if weights.fully_isolated() {
            let statistics = units
                .iter()
                .enumerate()
                .map(|(i, unit)| {
                    let z = components.deviations.get(i).copied().unwrap_or(0.0);
                    let (quadrant, label) = classify(z, 0.0, 1.0, config.significance_threshold);
                    LocalStatistic {
                        unit_id: unit.id,
                        attribute_value: unit.attribute_value,
                        z_deviation: z,
                        lag: 0.0,
                        local_i: 0.0,
                        p_value: 1.0,
                        quadrant,
                        label,
                    }
                })
                .collect();
            return Ok(AnalysisOutcome {
                statistics,
                flags: BatchFlags {
                    constant_attribute: components.constant_attribute,
                    degenerate_weights: true,
                },
            });
        }

        let p_values = conditional_permutation(
            &weights,
            &components,
            &config.permutations,
            &self.cancel,
            progress,
        )?;

        let statistics = units
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                let z = components.deviations.get(i).copied().unwrap_or(0.0);
                let lag = components.lags.get(i).copied().unwrap_or(0.0);
                let local_i = components.local_i.get(i).copied().unwrap_or(0.0);
                let p_value = p_values.get(i).copied().unwrap_or(1.0);
                let (quadrant, label) = classify(z, lag, p_value, config.significance_threshold);
                LocalStatistic {
                    unit_id: unit.id,
                    attribute_value: unit.attribute_value,
                    z_deviation: z,
                    lag,
                    local_i,
                    p_value,
                    quadrant,
                    label,
                }
            })
            .collect();

        Ok(AnalysisOutcome {
            statistics,
            flags: BatchFlags {
                constant_attribute: components.constant_attribute,
                degenerate_weights: false,
            },
        })
    }
}

impl ClusterEngine for LisaEngine {
    fn compute_clusters(
        &self,
        units: &[SpatialUnit],
        config: &AnalysisConfig,
    ) -> Result<AnalysisOutcome> {
        self.compute_with_progress(units, config, &SilentProgress)
    }
}

/// Run the full LISA pipeline with default engine state
///
/// Convenience wrapper over [`LisaEngine`] for callers that need neither
/// cancellation nor progress reporting.
///
/// # Errors
///
/// Returns an error if the batch is too small or the contiguity rule does
/// not fit the geometries.
pub fn compute_clusters(units: &[SpatialUnit], config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    LisaEngine::new().compute_clusters(units, config)
}
