//! Input/output operations and error handling

/// Command-line interface and run orchestration
pub mod cli;
/// Analysis constants and configuration defaults
pub mod configuration;
/// Error types for analysis operations
pub mod error;
/// CSV export of per-unit results
pub mod export;
/// Progress display for the permutation stage
pub mod progress;
/// Tabular data provider and year join
pub mod tables;
