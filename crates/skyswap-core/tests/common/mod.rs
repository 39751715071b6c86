#![allow(dead_code)]

use ndarray::Array2;

use skyswap_core::frame::RgbFrame;

/// Deterministic pseudo-random sample in [0, 1] for pixel `(row, col, salt)`.
pub fn noise(row: usize, col: usize, salt: usize) -> f32 {
    let mut x = (row as u64).wrapping_mul(73_856_093)
        ^ (col as u64).wrapping_mul(19_349_663)
        ^ (salt as u64).wrapping_mul(83_492_791);
    x ^= x >> 13;
    x = x.wrapping_mul(0x5bd1_e995);
    x ^= x >> 15;
    (x % 1000) as f32 / 999.0
}

/// Noise-filled RGB frame; `salt` picks a different pattern.
pub fn noise_frame(h: usize, w: usize, salt: usize) -> RgbFrame {
    RgbFrame::from_shape_fn(h, w, |(r, c, ch)| noise(r, c, salt * 3 + ch))
}

/// Noise-filled scalar field in [0, 1].
pub fn noise_field(h: usize, w: usize, salt: usize) -> Array2<f32> {
    Array2::from_shape_fn((h, w), |(r, c)| noise(r, c, salt))
}

/// Vertical step edge: 0.0 left of `edge_col`, 1.0 from it on.
pub fn step_field(h: usize, w: usize, edge_col: usize) -> Array2<f32> {
    Array2::from_shape_fn((h, w), |(_, c)| if c < edge_col { 0.0 } else { 1.0 })
}

/// Assert every sample of `data` is within `tol` of `expected`.
pub fn assert_all_near<'a>(data: impl IntoIterator<Item = &'a f32>, expected: f32, tol: f32) {
    for (i, v) in data.into_iter().enumerate() {
        assert!(
            (v - expected).abs() <= tol,
            "sample {i}: expected {expected}, got {v}"
        );
    }
}

/// Assert every sample is finite and inside [0, 1].
pub fn assert_unit_range<'a>(data: impl IntoIterator<Item = &'a f32>) {
    for (i, v) in data.into_iter().enumerate() {
        assert!(v.is_finite(), "sample {i} is not finite: {v}");
        assert!((0.0..=1.0).contains(v), "sample {i} out of range: {v}");
    }
}
