//! Neighbor graph construction from unit geometries
//!
//! Two units are neighbors when the configured contiguity rule connects their
//! geometries. The graph is symmetric by construction, has no self-loops, and
//! retains zero-neighbor units as isolates rather than dropping them.

use crate::io::configuration::VERTEX_QUANTIZATION;
use crate::io::error::{AnalysisError, Result, invalid_parameter};
use crate::spatial::geometry::{Geometry, SpatialUnit};
use ndarray::Array2;
use std::collections::HashMap;

/// Neighbor-detection rule applied to unit geometries
///
/// Queen contiguity is only defined for polygon boundaries. Point datasets
/// (e.g. municipality centroids) must use one of the distance-based proxies;
/// passing `Queen` with point geometries is rejected rather than silently
/// reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContiguityRule {
    /// Polygons are neighbors when they share any boundary vertex
    Queen,
    /// Each unit is connected to its k nearest units, symmetrized by union
    KNearest {
        /// Number of nearest neighbors per unit
        k: usize,
    },
    /// Units are neighbors when their anchors lie within a fixed distance
    DistanceBand {
        /// Inclusive distance threshold in coordinate units
        threshold: f64,
    },
}

/// Symmetric set of neighbor pairs over a batch of units
///
/// Stored as per-unit sorted neighbor lists. An isolate has an empty list,
/// which is a valid state and not an error.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyGraph {
    /// Build a graph from undirected edges over `unit_count` units
    ///
    /// Self-loops are discarded; duplicate edges collapse to one.
    pub fn from_edges(unit_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut neighbors = vec![Vec::new(); unit_count];
        for &(i, j) in edges {
            if i == j || i >= unit_count || j >= unit_count {
                continue;
            }
            if let Some(list) = neighbors.get_mut(i) {
                list.push(j);
            }
            if let Some(list) = neighbors.get_mut(j) {
                list.push(i);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbors }
    }

    /// Number of units the graph was built over
    pub const fn unit_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Sorted neighbor indices of unit `index`
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map_or(&[], Vec::as_slice)
    }

    /// Neighbor count of unit `index`
    pub fn degree(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    /// Whether unit `index` has no neighbors
    pub fn is_isolate(&self, index: usize) -> bool {
        self.neighbors(index).is_empty()
    }

    /// Whether every unit in the batch is an isolate
    pub fn fully_isolated(&self) -> bool {
        self.neighbors.iter().all(Vec::is_empty)
    }
}

/// Derive the neighbor graph for a batch of units under the given rule
///
/// Deterministic for a fixed geometry set and rule; nearest-neighbor distance
/// ties are broken by unit index.
///
/// # Errors
///
/// Returns an error if:
/// - Fewer than 2 units are supplied
/// - `Queen` is requested for a batch containing point geometries
/// - The rule parameters are out of range (k of 0 or >= unit count,
///   non-positive distance threshold)
pub fn build_adjacency(units: &[SpatialUnit], rule: &ContiguityRule) -> Result<AdjacencyGraph> {
    if units.len() < 2 {
        return Err(AnalysisError::InsufficientUnits {
            found: units.len(),
        });
    }

    match rule {
        ContiguityRule::Queen => queen_adjacency(units),
        ContiguityRule::KNearest { k } => k_nearest_adjacency(units, *k),
        ContiguityRule::DistanceBand { threshold } => distance_band_adjacency(units, *threshold),
    }
}

/// Quantize a coordinate so vertices equal within tolerance hash identically
fn quantize(value: f64) -> i64 {
    (value / VERTEX_QUANTIZATION).round() as i64
}

fn queen_adjacency(units: &[SpatialUnit]) -> Result<AdjacencyGraph> {
    if let Some(point_unit) = units.iter().find(|u| !u.geometry.is_polygon()) {
        return Err(invalid_parameter(
            "contiguity_rule",
            &"Queen",
            &format!(
                "unit {} has a point geometry; Queen contiguity requires polygon boundaries \
                 (choose a k-nearest or distance-band rule for point data)",
                point_unit.id
            ),
        ));
    }

    let mut vertex_owners: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (index, unit) in units.iter().enumerate() {
        if let Geometry::Polygon { exterior } = &unit.geometry {
            for vertex in exterior {
                let key = (quantize(vertex[0]), quantize(vertex[1]));
                let owners = vertex_owners.entry(key).or_default();
                // A polygon may repeat a vertex; record each owner once
                if owners.last() != Some(&index) {
                    owners.push(index);
                }
            }
        }
    }

    let mut edges = Vec::new();
    for owners in vertex_owners.values() {
        for (a, &i) in owners.iter().enumerate() {
            for &j in owners.iter().skip(a + 1) {
                edges.push((i, j));
            }
        }
    }

    Ok(AdjacencyGraph::from_edges(units.len(), &edges))
}

fn k_nearest_adjacency(units: &[SpatialUnit], k: usize) -> Result<AdjacencyGraph> {
    if k == 0 || k >= units.len() {
        return Err(invalid_parameter(
            "k",
            &k,
            &format!(
                "nearest-neighbor count must be between 1 and {} for {} units",
                units.len() - 1,
                units.len()
            ),
        ));
    }

    let distances = pairwise_squared_distances(units);
    let n = units.len();
    let mut edges = Vec::with_capacity(n * k);

    for i in 0..n {
        let mut candidates: Vec<(f64, usize)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (distances.get([i, j]).copied().unwrap_or(f64::INFINITY), j))
            .collect();
        // Index is the secondary key so equidistant candidates resolve deterministically
        candidates.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        for &(_, j) in candidates.iter().take(k) {
            edges.push((i, j));
        }
    }

    Ok(AdjacencyGraph::from_edges(n, &edges))
}

fn distance_band_adjacency(units: &[SpatialUnit], threshold: f64) -> Result<AdjacencyGraph> {
    if threshold.is_nan() || threshold <= 0.0 {
        return Err(invalid_parameter(
            "threshold",
            &threshold,
            &"distance band must be a positive distance",
        ));
    }

    let distances = pairwise_squared_distances(units);
    let squared_threshold = threshold * threshold;
    let n = units.len();
    let mut edges = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let d = distances.get([i, j]).copied().unwrap_or(f64::INFINITY);
            if d <= squared_threshold {
                edges.push((i, j));
            }
        }
    }

    Ok(AdjacencyGraph::from_edges(n, &edges))
}

fn pairwise_squared_distances(units: &[SpatialUnit]) -> Array2<f64> {
    let n = units.len();
    let mut distances = Array2::<f64>::zeros((n, n));
    for (i, a) in units.iter().enumerate() {
        for (j, b) in units.iter().enumerate().skip(i + 1) {
            let d = a.geometry.squared_distance(&b.geometry);
            if let Some(cell) = distances.get_mut([i, j]) {
                *cell = d;
            }
            if let Some(cell) = distances.get_mut([j, i]) {
                *cell = d;
            }
        }
    }
    distances
}
