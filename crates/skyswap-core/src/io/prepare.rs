use std::path::Path;

use ndarray::Array2;
use tracing::info;

use crate::error::Result;
use crate::filters::resize::{resize_bicubic, resize_rgb};
use crate::frame::{clip_unit, CanvasSize, RgbFrame};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::FrameInputs;

use super::image_io::{load_mask, load_rgb};

/// Canvas-normalized inputs for one composite run.
#[derive(Clone, Debug)]
pub struct PreparedInputs {
    pub source: RgbFrame,
    pub sky: RgbFrame,
    pub coarse_mask: Array2<f32>,
}

impl PreparedInputs {
    pub fn frame_inputs(&self) -> FrameInputs<'_> {
        FrameInputs {
            source: &self.source,
            sky: &self.sky,
            coarse_mask: &self.coarse_mask,
        }
    }
}

/// Load a photograph and resize it to the canvas.
pub fn prepare_source(path: &Path, canvas: CanvasSize) -> Result<RgbFrame> {
    let canvas = canvas.validated()?;
    let frame = load_rgb(path)?;
    resize_rgb(&frame, canvas.width, canvas.height)
}

/// Load a skybox and resize it to the canvas. The tiler zooms from there.
pub fn prepare_sky(path: &Path, canvas: CanvasSize) -> Result<RgbFrame> {
    prepare_source(path, canvas)
}

/// Upsample a coarse probability map to the canvas (bicubic) and clip to [0, 1].
pub fn normalize_mask(mask: &Array2<f32>, canvas: CanvasSize) -> Result<Array2<f32>> {
    let canvas = canvas.validated()?;
    let upsampled = if mask.dim() == (canvas.height, canvas.width) {
        mask.clone()
    } else {
        resize_bicubic(mask.view(), canvas.height, canvas.width)?
    };
    Ok(upsampled.mapv(clip_unit))
}

/// Load a coarse probability map and bring it to the canvas.
pub fn prepare_mask(path: &Path, canvas: CanvasSize) -> Result<Array2<f32>> {
    let mask = load_mask(path)?;
    normalize_mask(&mask, canvas)
}

/// Load source, sky and mask from a pipeline config, normalized to its canvas.
pub fn prepare_inputs(config: &PipelineConfig) -> Result<PreparedInputs> {
    config.validate()?;
    let canvas = config.canvas;
    info!(
        source = %config.source.display(),
        sky = %config.sky.display(),
        mask = %config.mask.display(),
        width = canvas.width,
        height = canvas.height,
        "Loading inputs"
    );
    Ok(PreparedInputs {
        source: prepare_source(&config.source, canvas)?,
        sky: prepare_sky(&config.sky, canvas)?,
        coarse_mask: prepare_mask(&config.mask, canvas)?,
    })
}
