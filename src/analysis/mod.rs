//! Batch summaries and the quartile fallback engine

/// Quartile-classification fallback engine
pub mod quartile;
/// Batch-level summary statistics over analysis outcomes
pub mod summary;

pub use quartile::QuartileEngine;
pub use summary::{BatchSummary, summarize};
