use ndarray::{Array3, Zip};
use tracing::debug;

use crate::consts::{COLOR_CHANNEL_COUNT, HALO_KERNEL_DIVISOR, HALO_STRENGTH};
use crate::error::Result;
use crate::filters::box_filter::{box_blur_channels, BorderMode};
use crate::frame::{clip_unit, ensure_same_dim, Matte, RgbFrame};

/// Side of the square halo blur kernel for a canvas of `width` pixels.
pub fn halo_kernel_size(width: usize) -> usize {
    (width / HALO_KERNEL_DIVISOR).max(1)
}

/// Screen blend `1 - (1 - a)(1 - b)`, evaluated as `a + b(1 - a)`.
///
/// The expanded form keeps `screen(a, b) >= a` exact in floating point for
/// `a <= 1` and `b >= 0`.
#[inline]
pub fn screen(a: f32, b: f32) -> f32 {
    a + b * (1.0 - a)
}

/// Simulate sky light bleeding over the horizon.
///
/// The matted sky is box-blurred with a kernel a fifth of the canvas width,
/// halved, and screen-blended onto `synth`.
pub fn apply_halo(synth: &RgbFrame, sky: &RgbFrame, matte: &Matte) -> Result<RgbFrame> {
    ensure_same_dim("halo (sky)", synth.dim(), sky.dim())?;
    ensure_same_dim("halo (matte)", synth.dim(), matte.dim())?;

    let (h, w) = synth.dim();
    let kernel = halo_kernel_size(w);
    debug!(kernel, "Halo blur");

    let lit = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(r, c, ch)| {
        sky.data[[r, c, ch]] * matte.data[[r, c]]
    });
    let glow = box_blur_channels(&lit, (kernel, kernel), BorderMode::Reflect101);

    let data = Zip::from(&synth.data)
        .and(&glow)
        .map_collect(|&s, &g| clip_unit(screen(s, HALO_STRENGTH * g)));
    Ok(RgbFrame { data })
}
