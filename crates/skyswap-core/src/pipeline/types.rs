use std::sync::Arc;

use crate::frame::{Matte, RgbFrame};

/// Pipeline processing stage, used for progress reporting and cache keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Loading,
    Refining,
    Tiling,
    Relighting,
    Blending,
    Halo,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading inputs"),
            Self::Refining => write!(f, "Refining matte"),
            Self::Tiling => write!(f, "Tiling skybox"),
            Self::Relighting => write!(f, "Matching light"),
            Self::Blending => write!(f, "Blending"),
            Self::Halo => write!(f, "Adding halo"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Result of one composite run, with the intermediates that produced it.
#[derive(Clone, Debug)]
pub struct CompositeOutput {
    /// Final composite (after the halo, when enabled).
    pub image: Arc<RgbFrame>,
    /// Refined sky matte.
    pub matte: Arc<Matte>,
    /// Skybox fitted to the canvas.
    pub sky: Arc<RgbFrame>,
    /// Recolored/relit foreground.
    pub relit: Arc<RgbFrame>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started.
    fn begin_stage(&self, _stage: PipelineStage) {}

    /// The current stage is finished. `cached` is true when the result
    /// came from the stage cache instead of being recomputed.
    fn finish_stage(&self, _stage: PipelineStage, _cached: bool) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
