use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::consts::{BICUBIC_A, COLOR_CHANNEL_COUNT};
use crate::error::{Result, SkyError};
use crate::frame::RgbFrame;

/// Two-tap linear interpolation entry for one output coordinate.
#[derive(Clone, Copy, Debug)]
struct LinearTap {
    i0: usize,
    i1: usize,
    t: f32,
}

/// Four-tap cubic interpolation entry for one output coordinate.
#[derive(Clone, Copy, Debug)]
struct CubicTap {
    idx: [usize; 4],
    weights: [f32; 4],
}

/// Pixel-center aligned source coordinate (no corner alignment).
fn source_coord(dst: usize, scale: f64) -> f64 {
    (dst as f64 + 0.5) * scale - 0.5
}

fn check_dims(in_h: usize, in_w: usize, out_h: usize, out_w: usize) -> Result<()> {
    if in_h == 0 || in_w == 0 {
        return Err(SkyError::InvalidDimensions {
            width: in_w,
            height: in_h,
        });
    }
    if out_h == 0 || out_w == 0 {
        return Err(SkyError::InvalidDimensions {
            width: out_w,
            height: out_h,
        });
    }
    Ok(())
}

fn linear_taps(out_len: usize, in_len: usize) -> Vec<LinearTap> {
    let scale = in_len as f64 / out_len as f64;
    let last = in_len - 1;
    (0..out_len)
        .map(|d| {
            let src = source_coord(d, scale);
            if src <= 0.0 {
                return LinearTap { i0: 0, i1: 0, t: 0.0 };
            }
            let i0 = src.floor() as usize;
            if i0 >= last {
                return LinearTap {
                    i0: last,
                    i1: last,
                    t: 0.0,
                };
            }
            LinearTap {
                i0,
                i1: i0 + 1,
                t: (src - i0 as f64) as f32,
            }
        })
        .collect()
}

/// Keys cubic convolution kernel.
fn cubic_weight(x: f32) -> f32 {
    let a = BICUBIC_A;
    let x = x.abs();
    if x <= 1.0 {
        ((a + 2.0) * x - (a + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((a * x - 5.0 * a) * x + 8.0 * a) * x - 4.0 * a
    } else {
        0.0
    }
}

fn cubic_taps(out_len: usize, in_len: usize) -> Vec<CubicTap> {
    let scale = in_len as f64 / out_len as f64;
    let last = in_len as isize - 1;
    (0..out_len)
        .map(|d| {
            let src = source_coord(d, scale);
            let base = src.floor();
            let t = (src - base) as f32;
            let base = base as isize;
            let idx = [-1isize, 0, 1, 2].map(|k| (base + k).clamp(0, last) as usize);
            let weights = [
                cubic_weight(t + 1.0),
                cubic_weight(t),
                cubic_weight(1.0 - t),
                cubic_weight(2.0 - t),
            ];
            CubicTap { idx, weights }
        })
        .collect()
}

/// Bilinear resize of a single channel to `(out_h, out_w)`.
pub fn resize_bilinear(data: ArrayView2<'_, f32>, out_h: usize, out_w: usize) -> Result<Array2<f32>> {
    let (in_h, in_w) = data.dim();
    check_dims(in_h, in_w, out_h, out_w)?;

    let ty = linear_taps(out_h, in_h);
    let tx = linear_taps(out_w, in_w);

    Ok(Array2::from_shape_fn((out_h, out_w), |(r, c)| {
        let y = ty[r];
        let x = tx[c];
        let top = data[[y.i0, x.i0]] * (1.0 - x.t) + data[[y.i0, x.i1]] * x.t;
        let bottom = data[[y.i1, x.i0]] * (1.0 - x.t) + data[[y.i1, x.i1]] * x.t;
        top * (1.0 - y.t) + bottom * y.t
    }))
}

/// Bilinear resize of an RGB frame to `width x height`, one channel at a time.
pub fn resize_rgb(frame: &RgbFrame, width: usize, height: usize) -> Result<RgbFrame> {
    let (in_h, in_w) = frame.dim();
    check_dims(in_h, in_w, height, width)?;
    if (in_h, in_w) == (height, width) {
        return Ok(frame.clone());
    }

    let mut data = Array3::<f32>::zeros((height, width, COLOR_CHANNEL_COUNT));
    for (c, mut dst) in data.axis_iter_mut(Axis(2)).enumerate() {
        dst.assign(&resize_bilinear(frame.channel(c), height, width)?);
    }
    Ok(RgbFrame { data })
}

/// Bicubic resize of a single channel (pixel-center aligned, edge clamped).
///
/// Used to bring a segmentation probability map up to canvas resolution.
/// Cubic overshoot is not clipped here.
pub fn resize_bicubic(data: ArrayView2<'_, f32>, out_h: usize, out_w: usize) -> Result<Array2<f32>> {
    let (in_h, in_w) = data.dim();
    check_dims(in_h, in_w, out_h, out_w)?;

    let ty = cubic_taps(out_h, in_h);
    let tx = cubic_taps(out_w, in_w);

    Ok(Array2::from_shape_fn((out_h, out_w), |(r, c)| {
        let y = &ty[r];
        let x = &tx[c];
        let mut acc = 0.0f32;
        for (&yi, &wy) in y.idx.iter().zip(&y.weights) {
            let mut row = 0.0f32;
            for (&xi, &wx) in x.idx.iter().zip(&x.weights) {
                row += data[[yi, xi]] * wx;
            }
            acc += row * wy;
        }
        acc
    }))
}
