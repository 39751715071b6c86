use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use skyswap_core::pipeline::{PipelineStage, ProgressReporter};

/// Spinner showing the running pipeline stage.
pub struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    pub fn new() -> anyhow::Result<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
        bar.enable_steady_tick(Duration::from_millis(100));
        Ok(Self { bar })
    }

    pub fn set_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl ProgressReporter for StageSpinner {
    fn begin_stage(&self, stage: PipelineStage) {
        self.set_stage(stage);
    }
}

/// Per-frame bar for batch runs; stage names go to the message slot.
pub struct FrameProgress {
    bar: ProgressBar,
}

impl FrameProgress {
    pub fn new(total: usize) -> anyhow::Result<Self> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:20} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}

impl ProgressReporter for FrameProgress {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
    }

    fn finish_stage(&self, stage: PipelineStage, cached: bool) {
        if cached {
            self.bar.set_message(format!("{stage} (cached)"));
        }
    }
}
