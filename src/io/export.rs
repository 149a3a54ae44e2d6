//! CSV export of per-unit analysis results

use crate::algorithm::classify::LocalStatistic;
use crate::io::error::{AnalysisError, Result};
use crate::spatial::geometry::SpatialUnit;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Quote a CSV field when it contains a delimiter, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write the result table as CSV, one row per unit
///
/// Units and statistics are matched positionally; the pipeline emits its
/// statistics in input-unit order. Numeric columns are rounded to three
/// decimals to match the displayed table.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_statistics_csv(
    path: &Path,
    units: &[SpatialUnit],
    statistics: &[LocalStatistic],
) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| AnalysisError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let write_error = |source| AnalysisError::Export {
        path: path.to_path_buf(),
        source,
    };

    writeln!(
        writer,
        "unit_id,name,state,region,attribute_value,z_deviation,lag,local_i,p_value,quadrant,label"
    )
    .map_err(write_error)?;

    for (unit, stat) in units.iter().zip(statistics) {
        writeln!(
            writer,
            "{},{},{},{},{:.3},{:.3},{:.3},{:.3},{:.3},{},{}",
            stat.unit_id,
            csv_field(&unit.name),
            csv_field(&unit.state_code),
            csv_field(&unit.region_code),
            stat.attribute_value,
            stat.z_deviation,
            stat.lag,
            stat.local_i,
            stat.p_value,
            stat.quadrant.code(),
            stat.label.code(),
        )
        .map_err(write_error)?;
    }

    writer.flush().map_err(write_error)
}
