//! Regression fixture for the deterministic local Moran computation
//!
//! Five units in a line A–B–C–D–E with adjacency restricted to immediate
//! neighbors and attribute values [10, 10, 10, 1, 1]. The expected numbers
//! are exact to three decimal places and independent of any seed.

use localmoran::algorithm::moran::local_moran;
use localmoran::spatial::adjacency::{ContiguityRule, build_adjacency};
use localmoran::spatial::geometry::{Geometry, SpatialUnit};
use localmoran::spatial::weights::WeightsMatrix;
use ndarray::Array1;

const TOLERANCE: f64 = 1e-3;

fn line_units(values: &[f64]) -> Vec<SpatialUnit> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| SpatialUnit {
            id: (i + 1) as u64,
            geometry: Geometry::Point {
                x: i as f64,
                y: 0.0,
            },
            attribute_value: value,
            name: format!("unit-{i}"),
            region_code: String::new(),
            state_code: String::new(),
        })
        .collect()
}

fn line_weights(units: &[SpatialUnit]) -> WeightsMatrix {
    let graph = build_adjacency(units, &ContiguityRule::DistanceBand { threshold: 1.0 })
        .expect("adjacency");
    WeightsMatrix::binary(&graph)
        .row_standardize()
        .expect("standardize")
}

#[test]
fn test_line_fixture_statistics() {
    let units = line_units(&[10.0, 10.0, 10.0, 1.0, 1.0]);
    let weights = line_weights(&units);
    let values: Array1<f64> = units.iter().map(|u| u.attribute_value).collect();
    let components = local_moran(&weights, &values).expect("local moran");

    assert!((components.mean - 6.4).abs() < TOLERANCE);
    assert!((components.m2 - 19.44).abs() < TOLERANCE);
    assert!(!components.constant_attribute);

    let expected_z = [3.6, 3.6, 3.6, -5.4, -5.4];
    let expected_i = [0.667, 0.667, -0.167, 0.25, 1.5];
    for (i, (&z, &local)) in expected_z.iter().zip(&expected_i).enumerate() {
        let got_z = components.deviations.get(i).copied().unwrap_or(f64::NAN);
        let got_i = components.local_i.get(i).copied().unwrap_or(f64::NAN);
        assert!(
            (got_z - z).abs() < TOLERANCE,
            "z[{i}] = {got_z}, expected {z}"
        );
        assert!(
            (got_i - local).abs() < TOLERANCE,
            "I[{i}] = {got_i}, expected {local}"
        );
    }
}

#[test]
fn test_isolates_get_zero_lag_and_statistic() {
    let units = line_units(&[10.0, 10.0, 10.0, 1.0, 1.0]);
    // Threshold below unit spacing disconnects everyone
    let graph = build_adjacency(&units, &ContiguityRule::DistanceBand { threshold: 0.5 })
        .expect("adjacency");
    let weights = WeightsMatrix::binary(&graph)
        .row_standardize()
        .expect("standardize");
    let values: Array1<f64> = units.iter().map(|u| u.attribute_value).collect();
    let components = local_moran(&weights, &values).expect("local moran");

    for i in 0..units.len() {
        assert_eq!(components.lags.get(i).copied(), Some(0.0));
        assert_eq!(components.local_i.get(i).copied(), Some(0.0));
    }
}

#[test]
fn test_constant_attribute_flagged_not_divided() {
    let units = line_units(&[4.0, 4.0, 4.0, 4.0, 4.0]);
    let weights = line_weights(&units);
    let values: Array1<f64> = units.iter().map(|u| u.attribute_value).collect();
    let components = local_moran(&weights, &values).expect("local moran");

    assert!(components.constant_attribute);
    assert_eq!(components.m2, 0.0);
    for i in 0..units.len() {
        assert_eq!(components.local_i.get(i).copied(), Some(0.0));
    }
}

#[test]
fn test_length_mismatch_rejected() {
    let units = line_units(&[10.0, 10.0, 10.0, 1.0, 1.0]);
    let weights = line_weights(&units);
    let short: Array1<f64> = Array1::zeros(3);
    assert!(local_moran(&weights, &short).is_err());

    let empty: Array1<f64> = Array1::zeros(0);
    assert!(local_moran(&weights, &empty).is_err());
}

#[test]
fn test_mean_of_locals_matches_global_moran() {
    use localmoran::analysis::summary::global_moran;

    let units = line_units(&[3.0, 8.0, 5.0, 13.0, 2.0]);
    let weights = line_weights(&units);
    let values: Array1<f64> = units.iter().map(|u| u.attribute_value).collect();
    let components = local_moran(&weights, &values).expect("local moran");

    let mean_local = components.local_i.sum() / units.len() as f64;
    let global = global_moran(&weights, &values);
    assert!(
        (mean_local - global).abs() < 1e-9,
        "mean local {mean_local} vs global {global}"
    );
}
