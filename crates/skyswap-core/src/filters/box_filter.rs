use ndarray::{Array2, Array3, ArrayView1, ArrayViewMut1, Axis, Zip};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// How samples outside the image are synthesized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Clamp to the nearest edge pixel: `aaa|abcd|ddd`.
    #[default]
    Replicate,
    /// Mirror without repeating the edge pixel: `dcb|abcd|cba`.
    Reflect101,
}

/// Sample types the running-sum box filter works on. Sums are always f64.
pub trait BoxSample: Copy + Default + Send + Sync {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl BoxSample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl BoxSample for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

/// Extent of a 1D averaging window around the output sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub before: usize,
    pub after: usize,
}

impl Window {
    /// Symmetric window of `2 * radius + 1` samples.
    pub fn centered(radius: usize) -> Self {
        Self {
            before: radius,
            after: radius,
        }
    }

    /// Window of `size` samples anchored at `size / 2`.
    /// A zero size is treated as a single sample.
    pub fn anchored(size: usize) -> Self {
        let size = size.max(1);
        Self {
            before: size / 2,
            after: size - 1 - size / 2,
        }
    }

    /// Number of samples covered.
    pub fn size(&self) -> usize {
        self.before + self.after + 1
    }
}

/// Map a possibly out-of-range index onto `0..n`.
pub fn border_index(i: isize, n: usize, mode: BorderMode) -> usize {
    let last = n as isize - 1;
    match mode {
        BorderMode::Replicate => i.clamp(0, last) as usize,
        BorderMode::Reflect101 => {
            if n == 1 {
                return 0;
            }
            let mut i = i;
            loop {
                if i < 0 {
                    i = -i;
                } else if i > last {
                    i = 2 * last - i;
                } else {
                    return i as usize;
                }
            }
        }
    }
}

/// Local mean over a `(2r+1) x (2r+1)` window with edge replication.
///
/// Cost is O(h*w + r*(h+w)) regardless of radius.
pub fn box_filter_array<T: BoxSample>(data: &Array2<T>, radius: usize) -> Array2<T> {
    let window = Window::centered(radius);
    box_filter_with(data, window, window, BorderMode::Replicate)
}

/// Normalized box blur with a `(kernel_w, kernel_h)` kernel anchored at its center.
pub fn box_blur_array<T: BoxSample>(data: &Array2<T>, kernel: (usize, usize), border: BorderMode) -> Array2<T> {
    box_filter_with(
        data,
        Window::anchored(kernel.1),
        Window::anchored(kernel.0),
        border,
    )
}

/// Box blur applied to each channel of an (h, w, c) buffer. Channels run in parallel.
pub fn box_blur_channels(data: &Array3<f32>, kernel: (usize, usize), border: BorderMode) -> Array3<f32> {
    let blurred: Vec<Array2<f32>> = (0..data.len_of(Axis(2)))
        .into_par_iter()
        .map(|c| box_blur_array(&data.index_axis(Axis(2), c).to_owned(), kernel, border))
        .collect();

    let mut result = Array3::<f32>::zeros(data.raw_dim());
    for (channel, mut dst) in blurred.iter().zip(result.axis_iter_mut(Axis(2))) {
        dst.assign(channel);
    }
    result
}

/// Separable box mean: a row pass with `horizontal`, then a column pass with `vertical`.
pub fn box_filter_with<T: BoxSample>(
    data: &Array2<T>,
    vertical: Window,
    horizontal: Window,
    border: BorderMode,
) -> Array2<T> {
    let row_pass = filter_lanes(data, Axis(1), horizontal, border);
    filter_lanes(&row_pass, Axis(0), vertical, border)
}

/// Run the 1D box mean along every lane parallel to `axis`.
fn filter_lanes<T: BoxSample>(data: &Array2<T>, axis: Axis, window: Window, border: BorderMode) -> Array2<T> {
    let (h, w) = data.dim();
    let mut result = Array2::from_elem((h, w), T::default());
    let zip = Zip::from(result.lanes_mut(axis)).and(data.lanes(axis));

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|dst, src| box_line(src, dst, window, border));
    } else {
        zip.for_each(|dst, src| box_line(src, dst, window, border));
    }
    result
}

/// Running-sum mean of one lane. Prefix sums are kept in f64 so long lanes do not drift.
fn box_line<T: BoxSample>(src: ArrayView1<'_, T>, mut dst: ArrayViewMut1<'_, T>, window: Window, border: BorderMode) {
    let n = src.len();
    if n == 0 {
        return;
    }
    let padded = n + window.before + window.after;
    let mut prefix = Vec::with_capacity(padded + 1);
    let mut acc = 0.0f64;
    prefix.push(acc);
    for k in 0..padded {
        let idx = border_index(k as isize - window.before as isize, n, border);
        acc += src[idx].to_f64();
        prefix.push(acc);
    }

    let count = window.size() as f64;
    for (i, out) in dst.iter_mut().enumerate() {
        *out = T::from_f64((prefix[i + window.size()] - prefix[i]) / count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicate_clamps_to_edges() {
        assert_eq!(border_index(-3, 5, BorderMode::Replicate), 0);
        assert_eq!(border_index(7, 5, BorderMode::Replicate), 4);
        assert_eq!(border_index(2, 5, BorderMode::Replicate), 2);
    }

    #[test]
    fn reflect101_mirrors_without_edge_repeat() {
        assert_eq!(border_index(-1, 5, BorderMode::Reflect101), 1);
        assert_eq!(border_index(-2, 5, BorderMode::Reflect101), 2);
        assert_eq!(border_index(5, 5, BorderMode::Reflect101), 3);
        assert_eq!(border_index(6, 5, BorderMode::Reflect101), 2);
        assert_eq!(border_index(-9, 3, BorderMode::Reflect101), 1);
        assert_eq!(border_index(4, 1, BorderMode::Reflect101), 0);
    }

    #[test]
    fn anchored_window_matches_even_kernel_split() {
        let w = Window::anchored(4);
        assert_eq!((w.before, w.after), (2, 1));
        let w = Window::anchored(5);
        assert_eq!((w.before, w.after), (2, 2));
        assert_eq!(Window::anchored(0).size(), 1);
    }

    #[test]
    fn box_line_matches_naive_sum() {
        let src = ndarray::arr1(&[1.0f32, 2.0, 3.0, 4.0]);
        let mut dst = ndarray::Array1::<f32>::zeros(4);
        box_line(src.view(), dst.view_mut(), Window::centered(1), BorderMode::Replicate);
        // [1,1,2] [1,2,3] [2,3,4] [3,4,4]
        let expected = [4.0 / 3.0, 2.0, 3.0, 11.0 / 3.0];
        for (got, want) in dst.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }
}
