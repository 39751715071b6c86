use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::CENTER_CROP_RANGE;
use crate::error::{Result, SkyError};
use crate::filters::guided::GuidedFilterParams;
use crate::frame::CanvasSize;

/// Per-invocation compositing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Fraction of the sky/foreground mean color difference added to the foreground (0.0..1.0).
    pub recoloring_factor: f32,
    /// Global brightness scale used when automatic light matching is off (0.0..1.0).
    pub relighting_factor: f32,
    /// Zoom applied to the skybox before cropping (1.0..1.2).
    pub skybox_center_crop: f32,
    /// Keep the statistically recolored foreground as-is instead of re-anchoring brightness.
    pub auto_light_matching: bool,
    /// Screen-blend blurred sky light over the composite.
    pub halo_effect: bool,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            recoloring_factor: 0.5,
            relighting_factor: 0.8,
            skybox_center_crop: 1.0,
            auto_light_matching: false,
            halo_effect: false,
        }
    }
}

impl CompositeConfig {
    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_range("recoloring_factor", self.recoloring_factor, 0.0, 1.0)?;
        check_range("relighting_factor", self.relighting_factor, 0.0, 1.0)?;
        let (lo, hi) = CENTER_CROP_RANGE;
        check_range("skybox_center_crop", self.skybox_center_crop, lo, hi)?;
        Ok(())
    }
}

fn check_range(name: &str, value: f32, lo: f32, hi: f32) -> Result<()> {
    if !(lo..=hi).contains(&value) {
        return Err(SkyError::InvalidConfig(format!(
            "{name} = {value} is outside [{lo}, {hi}]"
        )));
    }
    Ok(())
}

/// File-level description of one composite run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Photograph whose sky is replaced.
    pub source: PathBuf,
    /// Replacement sky image.
    pub sky: PathBuf,
    /// Coarse sky probability map (grayscale, any resolution).
    pub mask: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub canvas: CanvasSize,
    #[serde(default)]
    pub guided_filter: GuidedFilterParams,
    #[serde(default)]
    pub composite: CompositeConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.canvas.validated()?;
        if !(self.guided_filter.eps > 0.0) {
            return Err(SkyError::InvalidConfig(format!(
                "guided_filter.eps must be positive, got {}",
                self.guided_filter.eps
            )));
        }
        self.composite.validate()
    }
}
