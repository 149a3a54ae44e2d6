//! Validates neighbor detection and row standardization across contiguity rules

use localmoran::AnalysisError;
use localmoran::io::configuration::ROW_SUM_TOLERANCE;
use localmoran::spatial::adjacency::{AdjacencyGraph, ContiguityRule, build_adjacency};
use localmoran::spatial::geometry::{Geometry, SpatialUnit};
use localmoran::spatial::weights::WeightsMatrix;

fn point_unit(id: u64, x: f64, y: f64) -> SpatialUnit {
    SpatialUnit {
        id,
        geometry: Geometry::Point { x, y },
        attribute_value: 0.0,
        name: format!("unit-{id}"),
        region_code: String::new(),
        state_code: String::new(),
    }
}

fn polygon_unit(id: u64, exterior: Vec<[f64; 2]>) -> SpatialUnit {
    SpatialUnit {
        id,
        geometry: Geometry::Polygon { exterior },
        attribute_value: 0.0,
        name: format!("unit-{id}"),
        region_code: String::new(),
        state_code: String::new(),
    }
}

#[test]
fn test_insufficient_units_rejected() {
    let units = vec![point_unit(1, 0.0, 0.0)];
    let result = build_adjacency(&units, &ContiguityRule::KNearest { k: 1 });
    assert!(matches!(
        result,
        Err(AnalysisError::InsufficientUnits { found: 1 })
    ));
}

#[test]
fn test_distance_band_chain() {
    let units: Vec<SpatialUnit> = (0..5)
        .map(|i| point_unit(i + 1, i as f64, 0.0))
        .collect();
    let graph = build_adjacency(&units, &ContiguityRule::DistanceBand { threshold: 1.0 })
        .expect("adjacency");

    assert_eq!(graph.neighbors(0), &[1]);
    assert_eq!(graph.neighbors(1), &[0, 2]);
    assert_eq!(graph.neighbors(2), &[1, 3]);
    assert_eq!(graph.neighbors(3), &[2, 4]);
    assert_eq!(graph.neighbors(4), &[3]);
}

#[test]
fn test_distance_band_retains_isolates() {
    let units = vec![
        point_unit(1, 0.0, 0.0),
        point_unit(2, 1.0, 0.0),
        point_unit(3, 100.0, 100.0),
    ];
    let graph = build_adjacency(&units, &ContiguityRule::DistanceBand { threshold: 1.5 })
        .expect("adjacency");

    assert!(graph.is_isolate(2));
    assert!(!graph.fully_isolated());
    assert_eq!(graph.unit_count(), 3);
}

#[test]
fn test_k_nearest_is_symmetric() {
    // Unit 3 sits far away; k=1 still links it to its nearest unit, and the
    // union symmetrization links back
    let units = vec![
        point_unit(1, 0.0, 0.0),
        point_unit(2, 1.0, 0.0),
        point_unit(3, 10.0, 0.0),
    ];
    let graph = build_adjacency(&units, &ContiguityRule::KNearest { k: 1 }).expect("adjacency");

    for i in 0..graph.unit_count() {
        for &j in graph.neighbors(i) {
            assert!(
                graph.neighbors(j).contains(&i),
                "edge {i}-{j} must be symmetric"
            );
        }
    }
    assert!(graph.neighbors(2).contains(&1));
}

#[test]
fn test_k_nearest_rejects_bad_k() {
    let units = vec![point_unit(1, 0.0, 0.0), point_unit(2, 1.0, 0.0)];
    assert!(build_adjacency(&units, &ContiguityRule::KNearest { k: 0 }).is_err());
    assert!(build_adjacency(&units, &ContiguityRule::KNearest { k: 2 }).is_err());
}

#[test]
fn test_queen_contiguity_shared_edge_and_vertex() {
    // Two squares sharing an edge, one sharing only a corner, one detached
    let units = vec![
        polygon_unit(1, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        polygon_unit(2, vec![[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]),
        polygon_unit(3, vec![[2.0, 1.0], [3.0, 1.0], [3.0, 2.0], [2.0, 2.0]]),
        polygon_unit(4, vec![[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 11.0]]),
    ];
    let graph = build_adjacency(&units, &ContiguityRule::Queen).expect("adjacency");

    assert_eq!(graph.neighbors(0), &[1]);
    // Corner contact counts under Queen contiguity
    assert_eq!(graph.neighbors(1), &[0, 2]);
    assert_eq!(graph.neighbors(2), &[1]);
    assert!(graph.is_isolate(3));
}

#[test]
fn test_queen_rejects_point_geometries() {
    let units = vec![point_unit(1, 0.0, 0.0), point_unit(2, 1.0, 0.0)];
    let result = build_adjacency(&units, &ContiguityRule::Queen);
    assert!(matches!(
        result,
        Err(AnalysisError::InvalidParameter { .. })
    ));
}

#[test]
fn test_row_standardization_sums_to_one() {
    let units: Vec<SpatialUnit> = (0..5)
        .map(|i| point_unit(i + 1, i as f64, 0.0))
        .collect();
    let graph = build_adjacency(&units, &ContiguityRule::DistanceBand { threshold: 1.0 })
        .expect("adjacency");
    let weights = WeightsMatrix::binary(&graph)
        .row_standardize()
        .expect("standardize");

    for i in 0..weights.unit_count() {
        assert!((weights.row_sum(i) - 1.0).abs() < ROW_SUM_TOLERANCE);
    }

    // Interior units split weight evenly, endpoints put full weight on one side
    assert_eq!(weights.row(0), &[(1, 1.0)]);
    assert_eq!(weights.row(1), &[(0, 0.5), (2, 0.5)]);
}

#[test]
fn test_standardization_keeps_isolate_rows_empty() {
    let graph = AdjacencyGraph::from_edges(3, &[(0, 1)]);
    let weights = WeightsMatrix::binary(&graph)
        .row_standardize()
        .expect("standardize");

    assert!(weights.is_isolate(2));
    assert_eq!(weights.row_sum(2), 0.0);
}

#[test]
fn test_negative_weight_rejected() {
    let result = WeightsMatrix::from_rows(vec![vec![(1, -0.5)], vec![(0, 1.0)]]);
    assert!(matches!(
        result,
        Err(AnalysisError::InvalidWeight {
            unit_index: 0,
            ..
        })
    ));

    let raw = WeightsMatrix::from_rows(vec![vec![(1, 2.0)], vec![(0, 1.0)]]).expect("valid rows");
    let standardized = raw.row_standardize().expect("standardize");
    assert_eq!(standardized.row(0), &[(1, 1.0)]);
}

#[test]
fn test_from_edges_drops_self_loops_and_duplicates() {
    let graph = AdjacencyGraph::from_edges(3, &[(0, 0), (0, 1), (1, 0), (1, 2)]);
    assert_eq!(graph.neighbors(0), &[1]);
    assert_eq!(graph.neighbors(1), &[0, 2]);
    assert_eq!(graph.degree(1), 2);
}
