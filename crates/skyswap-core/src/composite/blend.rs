use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::Result;
use crate::frame::{clip_unit, ensure_same_dim, Matte, RgbFrame};
use crate::pipeline::config::CompositeConfig;

use super::halo::apply_halo;

/// `foreground * (1 - matte) + sky * matte`, with the matte as sky opacity.
pub fn alpha_blend(foreground: &RgbFrame, sky: &RgbFrame, matte: &Matte) -> Result<RgbFrame> {
    ensure_same_dim("composite (sky)", foreground.dim(), sky.dim())?;
    ensure_same_dim("composite (matte)", foreground.dim(), matte.dim())?;

    let (h, w) = foreground.dim();
    let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(r, c, ch)| {
        let alpha = matte.data[[r, c]];
        clip_unit(foreground.data[[r, c, ch]] * (1.0 - alpha) + sky.data[[r, c, ch]] * alpha)
    });
    Ok(RgbFrame { data })
}

/// Blend the relit foreground over the tiled sky, adding the halo when enabled.
pub fn composite(
    relit: &RgbFrame,
    sky: &RgbFrame,
    matte: &Matte,
    config: &CompositeConfig,
) -> Result<RgbFrame> {
    let synth = alpha_blend(relit, sky, matte)?;
    if config.halo_effect {
        apply_halo(&synth, sky, matte)
    } else {
        Ok(synth)
    }
}
