use ndarray::Array3;
use tracing::debug;

use crate::consts::{COLOR_CHANNEL_COUNT, MASKED_MEAN_EPSILON, THUMBNAIL_DIVISOR};
use crate::error::Result;
use crate::frame::{clip_unit, ensure_same_dim, Matte, RgbFrame};
use crate::pipeline::config::CompositeConfig;

/// Color statistics of the sky and of the non-sky part of the foreground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStats {
    /// Per-channel mean of the sky thumbnail.
    pub sky_mean: [f64; 3],
    /// Per-channel mean of the foreground thumbnail weighted by `1 - matte`.
    pub foreground_mean: [f64; 3],
    /// Thumbnail sampling stride used to estimate the means.
    pub stride: usize,
}

impl ColorStats {
    /// `sky_mean - foreground_mean` per channel.
    pub fn diff(&self) -> [f64; 3] {
        std::array::from_fn(|c| self.sky_mean[c] - self.foreground_mean[c])
    }
}

/// Sampling stride for statistics thumbnails: one row/column in `height / 20`.
pub fn thumbnail_stride(height: usize) -> usize {
    (height / THUMBNAIL_DIVISOR).max(1)
}

/// Estimate sky and foreground color means on strided thumbnails.
///
/// The foreground weight sum carries a small epsilon, so an all-sky matte
/// gives a zero foreground mean instead of NaN.
pub fn estimate_color_stats(foreground: &RgbFrame, sky: &RgbFrame, matte: &Matte) -> Result<ColorStats> {
    ensure_same_dim("light matching (sky)", foreground.dim(), sky.dim())?;
    ensure_same_dim("light matching (matte)", foreground.dim(), matte.dim())?;

    let (h, w) = foreground.dim();
    let stride = thumbnail_stride(h);

    let mut sky_sum = [0.0f64; COLOR_CHANNEL_COUNT];
    let mut fg_sum = [0.0f64; COLOR_CHANNEL_COUNT];
    let mut weight_sum = 0.0f64;
    let mut samples = 0usize;

    for row in (0..h).step_by(stride) {
        for col in (0..w).step_by(stride) {
            let weight = 1.0 - matte.data[[row, col]] as f64;
            for c in 0..COLOR_CHANNEL_COUNT {
                sky_sum[c] += sky.data[[row, col, c]] as f64;
                fg_sum[c] += foreground.data[[row, col, c]] as f64 * weight;
            }
            weight_sum += weight;
            samples += 1;
        }
    }

    let stats = ColorStats {
        sky_mean: sky_sum.map(|s| s / samples as f64),
        foreground_mean: fg_sum.map(|s| s / (weight_sum + MASKED_MEAN_EPSILON)),
        stride,
    };
    debug!(
        stride,
        sky_mean = ?stats.sky_mean,
        foreground_mean = ?stats.foreground_mean,
        "Light matching statistics"
    );
    Ok(stats)
}

/// Recolor and relight the foreground toward the replacement sky.
///
/// The foreground is shifted by `recoloring_factor` times the sky/foreground
/// mean difference. With automatic light matching that is the result. Otherwise
/// the shifted image is re-anchored to the original global mean and scaled by
/// `relighting_factor`. Clipping happens once, after all arithmetic.
pub fn relight(
    foreground: &RgbFrame,
    sky: &RgbFrame,
    matte: &Matte,
    config: &CompositeConfig,
) -> Result<RgbFrame> {
    let stats = estimate_color_stats(foreground, sky, matte)?;
    let diff = stats.diff();
    let shift: [f32; 3] = diff.map(|d| (config.recoloring_factor as f64 * d) as f32);

    let (h, w) = foreground.dim();
    let fg = &foreground.data;
    let tuned = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(r, c, ch)| {
        fg[[r, c, ch]] + shift[ch]
    });

    let adjusted = if config.auto_light_matching {
        tuned
    } else {
        let tuned_mean = mean_f64(&tuned);
        let offset = (foreground.mean() - tuned_mean) as f32;
        let scale = config.relighting_factor;
        tuned.mapv(|v| scale * (v + offset))
    };

    Ok(RgbFrame {
        data: adjusted.mapv(clip_unit),
    })
}

fn mean_f64(data: &Array3<f32>) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|&v| v as f64).sum::<f64>() / data.len() as f64
}
