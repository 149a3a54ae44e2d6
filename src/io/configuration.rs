//! Analysis constants and runtime configuration defaults

/// Default number of conditional permutations per unit
pub const DEFAULT_PERMUTATIONS: usize = 999;

/// Fixed seed for reproducible permutation streams
pub const DEFAULT_SEED: u64 = 42;

/// Default p-value threshold separating significant clusters from noise
pub const DEFAULT_SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Default nearest-neighbor count for point-geometry contiguity
pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;

// Coordinates within this tolerance hash to the same Queen-contiguity vertex
/// Quantization step for polygon vertex matching
pub const VERTEX_QUANTIZATION: f64 = 1e-7;

/// Tolerance for row-sum checks on standardized weights
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

// Odd multiplier decorrelates per-unit streams from the shared seed
/// Multiplier mixing unit index into the global permutation seed
pub const UNIT_STREAM_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Width of the permutation progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
