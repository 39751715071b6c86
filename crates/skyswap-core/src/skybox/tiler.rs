use ndarray::Array3;
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SkyError};
use crate::filters::resize::resize_rgb;
use crate::frame::{CanvasSize, RgbFrame};

/// Placement of the canvas inside the zoomed, wrapped skybox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGeometry {
    /// Skybox size after the center-crop zoom.
    pub resized_width: usize,
    pub resized_height: usize,
    /// Circular shift applied before cropping.
    pub offset_x: usize,
    pub offset_y: usize,
    /// Total crop margin (`resized - canvas`) on each axis.
    pub margin_x: usize,
    pub margin_y: usize,
}

impl TileGeometry {
    /// Compute the zoom, wrap offsets and crop margins for a canvas.
    ///
    /// `center_crop` below 1.0 would need a negative margin and is rejected.
    pub fn compute(canvas: CanvasSize, center_crop: f32) -> Result<Self> {
        let canvas = canvas.validated()?;
        if !(center_crop >= 1.0 && center_crop.is_finite()) {
            return Err(SkyError::InvalidInput(format!(
                "skybox center crop must be >= 1.0, got {center_crop}"
            )));
        }

        let (w, h) = (canvas.width, canvas.height);
        let cc = center_crop as f64;
        let resized_width = ((cc * w as f64) as usize).max(w);
        let resized_height = ((cc * h as f64) as usize).max(h);

        Ok(Self {
            resized_width,
            resized_height,
            offset_x: (resized_width as f64 / 2.0 - w as f64 / 2.0) as usize,
            offset_y: (resized_height as f64 / 2.0 - h as f64 / 2.0) as usize,
            margin_x: resized_width - w,
            margin_y: resized_height - h,
        })
    }
}

/// Fit a sky image of any size onto a `canvas`-sized buffer.
///
/// The sky is zoomed by `center_crop`, rotated so the seam sits under the crop
/// window, then the centered canvas-sized region is cut out. Panning that window
/// wraps around the rotated buffer without an edge.
pub fn tile_skybox(sky: &RgbFrame, canvas: CanvasSize, center_crop: f32) -> Result<RgbFrame> {
    let geom = TileGeometry::compute(canvas, center_crop)?;
    debug!(
        resized_width = geom.resized_width,
        resized_height = geom.resized_height,
        offset_x = geom.offset_x,
        offset_y = geom.offset_y,
        "Tiling skybox"
    );

    let resized = resize_rgb(sky, geom.resized_width, geom.resized_height)?;
    let top = geom.margin_y / 2;
    let left = geom.margin_x / 2;

    let data = Array3::from_shape_fn(
        (canvas.height, canvas.width, COLOR_CHANNEL_COUNT),
        |(r, c, ch)| {
            let src_r = (r + top + geom.offset_y) % geom.resized_height;
            let src_c = (c + left + geom.offset_x) % geom.resized_width;
            resized.data[[src_r, src_c, ch]]
        },
    );
    Ok(RgbFrame { data }.clipped())
}
