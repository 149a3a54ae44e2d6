//! Performance measurement for the conditional permutation stage at varying
//! batch sizes

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use localmoran::algorithm::moran::local_moran;
use localmoran::algorithm::permutation::{
    CancelToken, PermutationConfig, SilentProgress, conditional_permutation,
};
use localmoran::spatial::adjacency::{ContiguityRule, build_adjacency};
use localmoran::spatial::geometry::{Geometry, SpatialUnit};
use localmoran::spatial::weights::WeightsMatrix;
use ndarray::Array1;
use std::hint::black_box;

fn grid_units(side: usize) -> Vec<SpatialUnit> {
    (0..side * side)
        .map(|i| {
            let row = i / side;
            let col = i % side;
            SpatialUnit {
                id: (i + 1) as u64,
                geometry: Geometry::Point {
                    x: col as f64,
                    y: row as f64,
                },
                attribute_value: (row as f64).mul_add(2.0, (col as f64 * 1.3).sin() * 4.0),
                name: format!("cell-{i}"),
                region_code: String::new(),
                state_code: String::new(),
            }
        })
        .collect()
}

/// Measures permutation cost as the unit count grows
fn bench_conditional_permutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("conditional_permutation");

    for side in &[7_usize, 10, 14] {
        let units = grid_units(*side);
        let Ok(graph) = build_adjacency(&units, &ContiguityRule::KNearest { k: 5 }) else {
            group.finish();
            return;
        };
        let Ok(weights) = WeightsMatrix::binary(&graph).row_standardize() else {
            group.finish();
            return;
        };
        let values: Array1<f64> = units.iter().map(|u| u.attribute_value).collect();
        let Ok(components) = local_moran(&weights, &values) else {
            group.finish();
            return;
        };
        let config = PermutationConfig {
            count: 199,
            seed: 42,
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(units.len()),
            &units.len(),
            |b, _| {
                b.iter(|| {
                    let p_values = conditional_permutation(
                        black_box(&weights),
                        black_box(&components),
                        &config,
                        &CancelToken::new(),
                        &SilentProgress,
                    );
                    black_box(p_values)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_conditional_permutation);
criterion_main!(benches);
