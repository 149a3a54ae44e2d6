//! Progress display for the permutation stage

use crate::algorithm::permutation::ProgressSink;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PERMUTATION_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Units: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress bar advanced once per completed unit
///
/// The permutation stage dominates batch runtime, so its per-unit
/// completion events are the natural progress signal.
pub struct PermutationProgress {
    bar: ProgressBar,
}

impl PermutationProgress {
    /// Create a bar sized to the batch
    pub fn new(unit_count: usize) -> Self {
        let bar = ProgressBar::new(unit_count as u64);
        bar.set_style(PERMUTATION_STYLE.clone());
        Self { bar }
    }

    /// Complete and release the bar
    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl ProgressSink for PermutationProgress {
    fn unit_completed(&self) {
        self.bar.inc(1);
    }
}
