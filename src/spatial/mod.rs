//! Spatial data structures and weights construction
//!
//! This module contains spatial-related functionality including:
//! - Unit geometries and the joined spatial-unit record
//! - Neighbor detection under configurable contiguity rules
//! - Row-standardized spatial weights

/// Neighbor graph construction from unit geometries
pub mod adjacency;
/// Point and polygon geometries and the spatial-unit record
pub mod geometry;
/// Sparse spatial weights and row standardization
pub mod weights;

pub use adjacency::{AdjacencyGraph, ContiguityRule};
pub use geometry::SpatialUnit;
pub use weights::WeightsMatrix;
