//! Sparse spatial weights and row standardization

use crate::io::error::{AnalysisError, Result};
use crate::spatial::adjacency::AdjacencyGraph;

/// Sparse mapping from each unit to its weighted neighbors
///
/// Rows hold `(neighbor index, weight)` pairs sorted by neighbor index.
/// After row standardization every non-isolate row sums to 1.0 within
/// floating tolerance; isolate rows stay empty.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightsMatrix {
    rows: Vec<Vec<(usize, f64)>>,
}

impl WeightsMatrix {
    /// Binary weights from an adjacency graph: weight 1.0 per edge
    pub fn binary(graph: &AdjacencyGraph) -> Self {
        let rows = (0..graph.unit_count())
            .map(|i| graph.neighbors(i).iter().map(|&j| (j, 1.0)).collect())
            .collect();
        Self { rows }
    }

    /// Construct from explicit rows, validating weight signs
    ///
    /// # Errors
    ///
    /// Returns an error if any weight is negative or non-finite.
    pub fn from_rows(rows: Vec<Vec<(usize, f64)>>) -> Result<Self> {
        for (unit_index, row) in rows.iter().enumerate() {
            for &(_, weight) in row {
                if weight < 0.0 || !weight.is_finite() {
                    return Err(AnalysisError::InvalidWeight { unit_index, weight });
                }
            }
        }
        Ok(Self { rows })
    }

    /// Row-stochastic "r" transform: divide each row by its weight sum
    ///
    /// Isolate rows pass through empty. A row whose weights sum to zero is
    /// left untouched rather than divided.
    ///
    /// # Errors
    ///
    /// Returns an error if any weight is negative or non-finite, since a
    /// signed row sum would make the transform meaningless.
    pub fn row_standardize(&self) -> Result<Self> {
        let mut rows = Vec::with_capacity(self.rows.len());
        for (unit_index, row) in self.rows.iter().enumerate() {
            for &(_, weight) in row {
                if weight < 0.0 || !weight.is_finite() {
                    return Err(AnalysisError::InvalidWeight { unit_index, weight });
                }
            }
            let total: f64 = row.iter().map(|&(_, w)| w).sum();
            if total > 0.0 {
                rows.push(row.iter().map(|&(j, w)| (j, w / total)).collect());
            } else {
                rows.push(row.clone());
            }
        }
        Ok(Self { rows })
    }

    /// Number of units (rows)
    pub const fn unit_count(&self) -> usize {
        self.rows.len()
    }

    /// Weighted neighbors of unit `index`
    pub fn row(&self, index: usize) -> &[(usize, f64)] {
        self.rows.get(index).map_or(&[], Vec::as_slice)
    }

    /// Sum of the weights in row `index`
    pub fn row_sum(&self, index: usize) -> f64 {
        self.row(index).iter().map(|&(_, w)| w).sum()
    }

    /// Whether unit `index` has no weighted neighbors
    pub fn is_isolate(&self, index: usize) -> bool {
        self.row(index).is_empty()
    }

    /// Whether every row is empty
    pub fn fully_isolated(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }
}
