//! Tabular data provider: attribute and geometry tables joined into units
//!
//! The core engine never parses files; this module is the collaborator that
//! does. Tables arrive as JSON arrays, are deserialized with serde, and are
//! joined on unit id for one requested year. Rows with missing or non-finite
//! values are dropped, and multiple attribute rows for one (unit, year) pair
//! are averaged.

use crate::io::error::{AnalysisError, Result};
use crate::spatial::geometry::{Geometry, SpatialUnit};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One row of the attribute table
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeRow {
    /// Unit identifier shared with the geometry table
    pub unit_id: u64,
    /// Observation year
    pub year: u16,
    /// Raw attribute value; `null` marks a missing observation
    pub raw_value: Option<f64>,
    /// State or federal-unit code
    #[serde(default)]
    pub state: String,
    /// Region name
    #[serde(default)]
    pub region: String,
}

/// One row of the geometry table
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryRow {
    /// Unit identifier shared with the attribute table
    pub unit_id: u64,
    /// Anchor longitude (ignored when a polygon ring is present)
    #[serde(default)]
    pub longitude: f64,
    /// Anchor latitude (ignored when a polygon ring is present)
    #[serde(default)]
    pub latitude: f64,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Optional exterior polygon ring
    #[serde(default)]
    pub polygon: Option<Vec<[f64; 2]>>,
}

/// Load the attribute table from a JSON array file
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialized.
pub fn load_attribute_table(path: &Path) -> Result<Vec<AttributeRow>> {
    let contents = std::fs::read_to_string(path).map_err(|source| AnalysisError::TableLoad {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| AnalysisError::TableParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the geometry table from a JSON array file
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialized.
pub fn load_geometry_table(path: &Path) -> Result<Vec<GeometryRow>> {
    let contents = std::fs::read_to_string(path).map_err(|source| AnalysisError::TableLoad {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| AnalysisError::TableParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Accumulated attribute observations for one unit in one year
struct UnitAccumulator {
    sum: f64,
    count: usize,
    state: String,
    region: String,
}

/// Join the tables into spatial units for one year
///
/// Units present in only one table are excluded, not error-padded. Output is
/// sorted by unit id so downstream results are order-deterministic.
///
/// # Errors
///
/// Returns an error if:
/// - No attribute row carries a usable value for the requested year
/// - The filtered tables share no unit ids
pub fn join_year(
    attributes: &[AttributeRow],
    geometries: &[GeometryRow],
    year: u16,
) -> Result<Vec<SpatialUnit>> {
    let mut accumulators: BTreeMap<u64, UnitAccumulator> = BTreeMap::new();
    for row in attributes.iter().filter(|r| r.year == year) {
        let Some(value) = row.raw_value.filter(|v| v.is_finite()) else {
            continue;
        };
        accumulators
            .entry(row.unit_id)
            .and_modify(|acc| {
                acc.sum += value;
                acc.count += 1;
            })
            .or_insert_with(|| UnitAccumulator {
                sum: value,
                count: 1,
                state: row.state.clone(),
                region: row.region.clone(),
            });
    }

    if accumulators.is_empty() {
        return Err(AnalysisError::MissingYearData { year });
    }

    let mut geometry_rows: BTreeMap<u64, &GeometryRow> = BTreeMap::new();
    for row in geometries {
        geometry_rows.entry(row.unit_id).or_insert(row);
    }

    let units: Vec<SpatialUnit> = accumulators
        .into_iter()
        .filter_map(|(unit_id, acc)| {
            let geometry_row = geometry_rows.get(&unit_id)?;
            let geometry = match &geometry_row.polygon {
                Some(ring) if !ring.is_empty() => Geometry::Polygon {
                    exterior: ring.clone(),
                },
                _ => Geometry::Point {
                    x: geometry_row.longitude,
                    y: geometry_row.latitude,
                },
            };
            Some(SpatialUnit {
                id: unit_id,
                geometry,
                attribute_value: acc.sum / acc.count as f64,
                name: geometry_row.name.clone(),
                region_code: acc.region,
                state_code: acc.state,
            })
        })
        .collect();

    if units.is_empty() {
        return Err(AnalysisError::EmptyJoin { year });
    }

    Ok(units)
}
