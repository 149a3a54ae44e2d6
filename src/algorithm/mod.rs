//! Core statistical engine: local Moran, permutation inference, classification

/// Quadrant and cluster-label classification
pub mod classify;
/// Deterministic local Moran statistic and spatial lag
pub mod moran;
/// Conditional permutation significance testing
pub mod permutation;
/// Pipeline orchestration and engine strategies
pub mod pipeline;

pub use pipeline::{AnalysisConfig, AnalysisOutcome, ClusterEngine, compute_clusters};
