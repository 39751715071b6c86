use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_GUIDED_EPS, DEFAULT_GUIDED_RADIUS, GUIDANCE_CHANNEL};
use crate::error::{Result, SkyError};
use crate::filters::box_filter::box_filter_array;
use crate::frame::{ensure_same_dim, Matte, RgbFrame};

/// Guided filter parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GuidedFilterParams {
    /// Window radius; the local window is `(2r+1) x (2r+1)`.
    pub radius: usize,
    /// Variance regularizer. Larger values smooth more across edges.
    pub eps: f32,
}

impl Default for GuidedFilterParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_GUIDED_RADIUS,
            eps: DEFAULT_GUIDED_EPS,
        }
    }
}

/// Edge-aware smoothing of `input` steered by `guidance` (He et al. guided filter).
///
/// Fits `q = a * I + b` in every local window, then averages the coefficients
/// of all windows covering a pixel. Every local mean is a separable box filter,
/// so the cost does not depend on `radius`.
///
/// All intermediates are f64: with a tiny `eps` the covariance/variance ratio
/// amplifies rounding in the local means. Flat guidance (zero variance)
/// collapses to `a = 0`, `b = mean(p)` through the `eps` term, and a constant
/// input is reproduced for any `eps > 0`.
pub fn guided_filter(
    guidance: ArrayView2<'_, f32>,
    input: &Array2<f32>,
    radius: usize,
    eps: f32,
) -> Result<Array2<f32>> {
    ensure_same_dim("guided filter", guidance.dim(), input.dim())?;
    if !(eps > 0.0 && eps.is_finite()) {
        return Err(SkyError::InvalidInput(format!(
            "guided filter eps must be positive and finite, got {eps}"
        )));
    }

    let (h, w) = input.dim();
    debug!(height = h, width = w, radius, eps, "Guided filter");

    let eps = eps as f64;
    let guide = guidance.mapv(f64::from);
    let target = input.mapv(f64::from);
    let mean_i = box_filter_array(&guide, radius);
    let mean_p = box_filter_array(&target, radius);
    let mean_ip = box_filter_array(&(&guide * &target), radius);
    let mean_ii = box_filter_array(&(&guide * &guide), radius);

    let a = Zip::from(&mean_ip)
        .and(&mean_ii)
        .and(&mean_i)
        .and(&mean_p)
        .map_collect(|&ip, &ii, &i, &p| {
            let cov_ip = ip - i * p;
            let var_i = ii - i * i;
            cov_ip / (var_i + eps)
        });
    let b = Zip::from(&mean_p)
        .and(&a)
        .and(&mean_i)
        .map_collect(|&p, &a, &i| p - a * i);

    let mean_a = box_filter_array(&a, radius);
    let mean_b = box_filter_array(&b, radius);

    Ok(Zip::from(&mean_a)
        .and(&mean_b)
        .and(&guide)
        .map_collect(|&a, &b, &g| (a * g + b) as f32))
}

/// Refine a coarse sky probability map into an alpha matte.
///
/// The blue channel of `source` drives the edge-awareness. `coarse` must already
/// be at the source resolution.
pub fn refine_matte(
    source: &RgbFrame,
    coarse: &Array2<f32>,
    params: &GuidedFilterParams,
) -> Result<Matte> {
    let refined = guided_filter(
        source.channel(GUIDANCE_CHANNEL),
        coarse,
        params.radius,
        params.eps,
    )?;
    Ok(Matte::new(refined))
}
