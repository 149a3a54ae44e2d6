//! Command-line interface for batch spatial-cluster analysis

use crate::algorithm::permutation::PermutationConfig;
use crate::algorithm::pipeline::{AnalysisConfig, AnalysisOutcome, ClusterEngine, LisaEngine};
use crate::analysis::quartile::QuartileEngine;
use crate::analysis::summary::{BatchSummary, summarize};
use crate::io::configuration::{
    DEFAULT_NEIGHBOR_COUNT, DEFAULT_PERMUTATIONS, DEFAULT_SEED, DEFAULT_SIGNIFICANCE_THRESHOLD,
};
use crate::io::error::Result;
use crate::io::export::export_statistics_csv;
use crate::io::progress::PermutationProgress;
use crate::io::tables::{join_year, load_attribute_table, load_geometry_table};
use crate::spatial::adjacency::ContiguityRule;
use crate::spatial::geometry::SpatialUnit;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the cluster analysis tool
#[derive(Parser)]
#[command(name = "lisamap")]
#[command(
    author,
    version,
    about = "Compute local spatial-association clusters from attribute and geometry tables"
)]
pub struct Cli {
    /// Attribute table (JSON array of unit/year/value rows)
    #[arg(value_name = "ATTRIBUTES")]
    pub attributes: PathBuf,

    /// Geometry table (JSON array of unit coordinate rows)
    #[arg(value_name = "GEOMETRIES")]
    pub geometries: PathBuf,

    /// Year to analyze
    #[arg(short, long)]
    pub year: u16,

    /// Random seed for reproducible permutation streams
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of conditional permutations per unit
    #[arg(short, long, default_value_t = DEFAULT_PERMUTATIONS)]
    pub permutations: usize,

    /// p-value threshold separating clusters from noise
    #[arg(short = 't', long, default_value_t = DEFAULT_SIGNIFICANCE_THRESHOLD)]
    pub threshold: f64,

    /// Nearest-neighbor count for point geometries
    #[arg(short = 'k', long, default_value_t = DEFAULT_NEIGHBOR_COUNT)]
    pub neighbors: usize,

    /// Use a distance band of this radius instead of nearest neighbors
    #[arg(short = 'd', long)]
    pub distance_band: Option<f64>,

    /// Use Queen contiguity (requires polygon geometries)
    #[arg(short = 'Q', long)]
    pub queen: bool,

    /// Classify by attribute quartiles without permutation inference
    #[arg(long)]
    pub quartile: bool,

    /// Write the result table to this CSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress and summaries should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Contiguity rule selected by the flags
    ///
    /// Queen wins over a distance band, which wins over the k-nearest
    /// default.
    pub fn contiguity_rule(&self) -> ContiguityRule {
        if self.queen {
            ContiguityRule::Queen
        } else if let Some(threshold) = self.distance_band {
            ContiguityRule::DistanceBand { threshold }
        } else {
            ContiguityRule::KNearest { k: self.neighbors }
        }
    }
}

/// Orchestrates one analysis run from table files to summary and export
pub struct AnalysisRunner {
    cli: Cli,
}

impl AnalysisRunner {
    /// Create a runner with the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load, join, analyze, summarize, and optionally export
    ///
    /// # Errors
    ///
    /// Returns an error if table loading, the join, the analysis, or the
    /// export fails.
    pub fn process(&mut self) -> Result<()> {
        let attributes = load_attribute_table(&self.cli.attributes)?;
        let geometries = load_geometry_table(&self.cli.geometries)?;
        let units = join_year(&attributes, &geometries, self.cli.year)?;

        let config = AnalysisConfig {
            contiguity: self.cli.contiguity_rule(),
            permutations: PermutationConfig {
                count: self.cli.permutations,
                seed: self.cli.seed,
            },
            significance_threshold: self.cli.threshold,
        };

        let outcome = self.run_engine(&units, &config)?;

        if self.cli.should_show_progress() {
            Self::print_summary(self.cli.year, &summarize(&outcome), &outcome);
        }

        if let Some(ref output) = self.cli.output {
            export_statistics_csv(output, &units, &outcome.statistics)?;
        }

        Ok(())
    }

    // Engine strategy is chosen once per run; both backends share a contract
    fn run_engine(
        &self,
        units: &[SpatialUnit],
        config: &AnalysisConfig,
    ) -> Result<AnalysisOutcome> {
        if self.cli.quartile {
            return QuartileEngine::new().compute_clusters(units, config);
        }

        let engine = LisaEngine::new();
        if self.cli.should_show_progress() {
            let progress = PermutationProgress::new(units.len());
            let outcome = engine.compute_with_progress(units, config, &progress);
            progress.finish();
            outcome
        } else {
            engine.compute_clusters(units, config)
        }
    }

    // Allow print for the user-facing summary block
    #[allow(clippy::print_stdout)]
    fn print_summary(year: u16, summary: &BatchSummary, outcome: &AnalysisOutcome) {
        println!("Analysis results for {year}");
        println!("  Units analyzed: {}", summary.unit_count);
        println!(
            "  Significant clusters: {} ({:.1}%)",
            summary.significant_count,
            summary.significant_share * 100.0
        );
        if let Some(attribute) = &summary.attribute {
            println!(
                "  Attribute: mean {:.2}, median {:.2}, std {:.2}, range {:.2}..{:.2}",
                attribute.mean, attribute.median, attribute.std_dev, attribute.min, attribute.max
            );
        }
        println!("  Mean local Moran's I: {:.3}", summary.mean_local_i);
        println!("  Cluster distribution:");
        for &(label, count) in &summary.label_counts {
            let share = if summary.unit_count > 0 {
                count as f64 / summary.unit_count as f64 * 100.0
            } else {
                0.0
            };
            println!("    {:>2}: {count} ({share:.1}%)", label.code());
        }
        if outcome.flags.constant_attribute {
            println!("  Note: attribute vector is constant; all statistics are zero");
        }
        if outcome.flags.degenerate_weights {
            println!("  Note: every unit is an isolate; inference was skipped");
        }
    }
}
