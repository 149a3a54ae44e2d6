//! Local indicators of spatial association for attribute-tagged geographic units
//!
//! The crate joins attribute and geometry tables into spatial units, derives a
//! symmetric neighbor graph, row-standardizes it into spatial weights, and computes
//! local Moran statistics with conditional-permutation significance estimates and
//! cluster-quadrant labels.

#![forbid(unsafe_code)]

/// Core statistical engine: local Moran, permutation inference, and classification
pub mod algorithm;
/// Batch summaries and the quartile fallback engine
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Mathematical utilities for summary statistics
pub mod math;
/// Geometries, adjacency construction, and spatial weights
pub mod spatial;

pub use io::error::{AnalysisError, Result};
