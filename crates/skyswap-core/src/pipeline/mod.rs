pub mod cache;
pub mod config;
mod orchestrator;
mod types;

pub use cache::{Fingerprint, FingerprintBuilder, StageCache};
pub use orchestrator::{run_composite, run_composite_reported, CompositePipeline, FrameInputs};
pub use types::{CompositeOutput, NoOpReporter, PipelineStage, ProgressReporter};
