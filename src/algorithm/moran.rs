//! Deterministic local Moran statistic and spatial lag
//!
//! Computes, per unit, the mean deviation `z_i`, the spatial lag
//! `lag_i = Σ_j W[i][j] · z_j`, and the local statistic
//! `I_i = (z_i / m2) · lag_i` where `m2 = Σ z² / N`. This stage uses no
//! randomness; the permutation test perturbs exactly this computation.

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::weights::WeightsMatrix;
use ndarray::Array1;

/// Deterministic per-unit components of the local Moran statistic
#[derive(Debug, Clone)]
pub struct MoranComponents {
    /// Mean of the attribute vector
    pub mean: f64,
    /// Variance proxy `Σ z² / N`
    pub m2: f64,
    /// Per-unit deviation from the mean
    pub deviations: Array1<f64>,
    /// Per-unit spatial lag (zero for isolates)
    pub lags: Array1<f64>,
    /// Per-unit local Moran statistic
    pub local_i: Array1<f64>,
    /// Set when the attribute vector is constant (`m2 = 0`); all statistics
    /// are zero by definition rather than by a silent division
    pub constant_attribute: bool,
}

/// Compute deviations, spatial lags, and local Moran statistics
///
/// Fully deterministic for a given `(weights, values)` pair. Isolates get a
/// zero lag and a zero statistic. A constant attribute vector yields all-zero
/// statistics with the `constant_attribute` flag raised instead of dividing
/// by a zero variance proxy.
///
/// # Errors
///
/// Returns an error if `values` is empty or its length differs from the
/// weight matrix dimension.
pub fn local_moran(weights: &WeightsMatrix, values: &Array1<f64>) -> Result<MoranComponents> {
    let n = values.len();
    if n == 0 {
        return Err(invalid_parameter(
            "values",
            &"[]",
            &"attribute vector must not be empty",
        ));
    }
    if n != weights.unit_count() {
        return Err(invalid_parameter(
            "values",
            &n,
            &format!(
                "attribute vector length must match the {} weight rows",
                weights.unit_count()
            ),
        ));
    }

    let mean = values.sum() / n as f64;
    let deviations = values.mapv(|v| v - mean);
    let m2 = deviations.iter().map(|z| z * z).sum::<f64>() / n as f64;
    let constant_attribute = m2 == 0.0;

    let mut lags = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut lag = 0.0;
        for &(j, w) in weights.row(i) {
            let z = deviations.get(j).copied().unwrap_or(0.0);
            lag = w.mul_add(z, lag);
        }
        if let Some(cell) = lags.get_mut(i) {
            *cell = lag;
        }
    }

    let local_i = if constant_attribute {
        Array1::<f64>::zeros(n)
    } else {
        let mut stats = Array1::<f64>::zeros(n);
        for i in 0..n {
            let z = deviations.get(i).copied().unwrap_or(0.0);
            let lag = lags.get(i).copied().unwrap_or(0.0);
            if let Some(cell) = stats.get_mut(i) {
                *cell = (z / m2) * lag;
            }
        }
        stats
    };

    Ok(MoranComponents {
        mean,
        m2,
        deviations,
        lags,
        local_i,
        constant_attribute,
    })
}
