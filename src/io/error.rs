//! Error types for analysis operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all analysis operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Failed to read a source table from the filesystem
    TableLoad {
        /// Path to the table file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to deserialize a source table
    TableParse {
        /// Path to the table file
        path: PathBuf,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// No attribute rows exist for the requested year
    MissingYearData {
        /// The requested year
        year: u16,
    },

    /// Attribute and geometry tables share no unit identifiers
    EmptyJoin {
        /// The requested year
        year: u16,
    },

    /// Too few joined units to build spatial weights
    InsufficientUnits {
        /// Number of units present
        found: usize,
    },

    /// A spatial weight was negative or non-finite
    InvalidWeight {
        /// Row the weight was found in
        unit_index: usize,
        /// The offending weight
        weight: f64,
    },

    /// Analysis parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The batch was cancelled before all units completed
    Cancelled {
        /// Units whose permutation loop had finished at cancellation
        completed_units: usize,
    },

    /// Failed to write the result table to disk
    Export {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableLoad { path, source } => {
                write!(f, "Failed to read table '{}': {source}", path.display())
            }
            Self::TableParse { path, source } => {
                write!(f, "Failed to parse table '{}': {source}", path.display())
            }
            Self::MissingYearData { year } => {
                write!(f, "No attribute rows for year {year}")
            }
            Self::EmptyJoin { year } => {
                write!(
                    f,
                    "Attribute and geometry tables share no unit ids for year {year}"
                )
            }
            Self::InsufficientUnits { found } => {
                write!(
                    f,
                    "Spatial weights require at least 2 units, found {found}"
                )
            }
            Self::InvalidWeight { unit_index, weight } => {
                write!(f, "Invalid weight {weight} in row {unit_index}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Cancelled { completed_units } => {
                write!(
                    f,
                    "Analysis cancelled after {completed_units} completed units"
                )
            }
            Self::Export { path, source } => {
                write!(
                    f,
                    "Failed to export results to '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TableLoad { source, .. } | Self::Export { source, .. } => Some(source),
            Self::TableParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::AnalysisError;
    use std::error::Error;

    #[test]
    fn test_display_formats_context() {
        let err = AnalysisError::InsufficientUnits { found: 1 };
        assert_eq!(
            err.to_string(),
            "Spatial weights require at least 2 units, found 1"
        );

        let err = AnalysisError::Cancelled { completed_units: 7 };
        assert!(err.to_string().contains("7 completed units"));
        assert!(err.source().is_none());
    }
}
