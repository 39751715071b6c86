use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::consts::{COLOR_CHANNEL_COUNT, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::error::{Result, SkyError};

/// Clamp a sample to [0.0, 1.0]. NaN maps to 0.0.
#[inline]
pub fn clip_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// A dense RGB image.
/// Pixel values are f32 in [0.0, 1.0], linear scale.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbFrame {
    /// Pixel data, row-major, shape = (height, width, 3)
    pub data: Array3<f32>,
}

impl RgbFrame {
    /// Wrap an array, checking it is a non-empty (h, w, 3) buffer.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != COLOR_CHANNEL_COUNT {
            return Err(SkyError::InvalidInput(format!(
                "expected {COLOR_CHANNEL_COUNT} channels, got {c}"
            )));
        }
        if h == 0 || w == 0 {
            return Err(SkyError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok(Self { data })
    }

    /// A frame where every pixel is `rgb`.
    pub fn filled(height: usize, width: usize, rgb: [f32; 3]) -> Self {
        Self {
            data: Array3::from_shape_fn((height, width, COLOR_CHANNEL_COUNT), |(_, _, c)| rgb[c]),
        }
    }

    /// Build a frame from a per-sample function `(row, col, channel) -> value`.
    pub fn from_shape_fn<F>(height: usize, width: usize, f: F) -> Self
    where
        F: FnMut((usize, usize, usize)) -> f32,
    {
        Self {
            data: Array3::from_shape_fn((height, width, COLOR_CHANNEL_COUNT), f),
        }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Spatial dimensions as (height, width).
    pub fn dim(&self) -> (usize, usize) {
        let (h, w, _) = self.data.dim();
        (h, w)
    }

    /// Borrow a single channel as a 2D view.
    pub fn channel(&self, index: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(2), index)
    }

    /// Mean over all pixels and channels, accumulated in f64.
    pub fn mean(&self) -> f64 {
        let n = self.data.len();
        if n == 0 {
            return 0.0;
        }
        self.data.iter().map(|&v| v as f64).sum::<f64>() / n as f64
    }

    /// Copy with every sample clipped to [0, 1].
    pub fn clipped(&self) -> Self {
        Self {
            data: self.data.mapv(clip_unit),
        }
    }
}

/// Per-pixel sky opacity in [0.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct Matte {
    /// Alpha values, shape = (height, width)
    pub data: Array2<f32>,
}

impl Matte {
    /// Wrap an alpha field, clipping it to [0, 1].
    pub fn new(data: Array2<f32>) -> Self {
        Self {
            data: data.mapv(clip_unit),
        }
    }

    pub fn filled(height: usize, width: usize, alpha: f32) -> Self {
        Self::new(Array2::from_elem((height, width), alpha))
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Replicate the matte across three channels, shape = (height, width, 3).
    pub fn to_rgb(&self) -> Array3<f32> {
        let (h, w) = self.data.dim();
        Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(r, c, _)| self.data[[r, c]])
    }
}

/// Output canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    pub width: usize,
    pub height: usize,
}

impl CanvasSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Reject zero-area canvases.
    pub fn validated(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(SkyError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

/// Fail with `ShapeMismatch` unless `actual` equals `expected`.
pub(crate) fn ensure_same_dim(
    stage: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<()> {
    if expected != actual {
        return Err(SkyError::ShapeMismatch {
            stage,
            expected,
            actual,
        });
    }
    Ok(())
}
