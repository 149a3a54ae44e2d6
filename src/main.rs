//! CLI entry point for local spatial-association analysis

use clap::Parser;
use localmoran::io::cli::{AnalysisRunner, Cli};

fn main() -> localmoran::Result<()> {
    let cli = Cli::parse();
    let mut runner = AnalysisRunner::new(cli);
    runner.process()
}
