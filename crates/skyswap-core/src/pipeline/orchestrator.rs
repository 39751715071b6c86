use std::sync::Arc;
use std::time::Instant;

use ndarray::Array2;
use tracing::{debug, info};

use crate::composite::{alpha_blend, apply_halo};
use crate::error::Result;
use crate::filters::guided::{refine_matte, GuidedFilterParams};
use crate::frame::{ensure_same_dim, CanvasSize, RgbFrame};
use crate::relight::relight;
use crate::skybox::tile_skybox;

use super::cache::{Cacheable, Fingerprint, FingerprintBuilder, StageCache};
use super::config::CompositeConfig;
use super::types::{CompositeOutput, NoOpReporter, PipelineStage, ProgressReporter};

/// Inputs for one frame. The source and coarse mask must already be at canvas size.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Source photograph, defines the canvas.
    pub source: &'a RgbFrame,
    /// Raw skybox at any resolution.
    pub sky: &'a RgbFrame,
    /// Coarse sky probability at canvas resolution.
    pub coarse_mask: &'a Array2<f32>,
}

impl FrameInputs<'_> {
    fn canvas(&self) -> Result<CanvasSize> {
        let (h, w) = self.source.dim();
        let canvas = CanvasSize::new(w, h).validated()?;
        ensure_same_dim("coarse mask", (h, w), self.coarse_mask.dim())?;
        Ok(canvas)
    }
}

/// Run every stage once, without caching.
pub fn run_composite(
    inputs: FrameInputs<'_>,
    params: &GuidedFilterParams,
    config: &CompositeConfig,
) -> Result<CompositeOutput> {
    run_composite_reported(inputs, params, config, &NoOpReporter)
}

/// Run every stage once, reporting stage boundaries.
pub fn run_composite_reported(
    inputs: FrameInputs<'_>,
    params: &GuidedFilterParams,
    config: &CompositeConfig,
    reporter: &dyn ProgressReporter,
) -> Result<CompositeOutput> {
    config.validate()?;
    let canvas = inputs.canvas()?;
    info!(
        width = canvas.width,
        height = canvas.height,
        auto_light_matching = config.auto_light_matching,
        halo = config.halo_effect,
        "Compositing frame"
    );

    let matte = timed(reporter, PipelineStage::Refining, || {
        refine_matte(inputs.source, inputs.coarse_mask, params)
    })?;
    let sky = timed(reporter, PipelineStage::Tiling, || {
        tile_skybox(inputs.sky, canvas, config.skybox_center_crop)
    })?;
    let relit = timed(reporter, PipelineStage::Relighting, || {
        relight(inputs.source, &sky, &matte, config)
    })?;
    let synth = timed(reporter, PipelineStage::Blending, || {
        alpha_blend(&relit, &sky, &matte)
    })?;
    let image = if config.halo_effect {
        timed(reporter, PipelineStage::Halo, || apply_halo(&synth, &sky, &matte))?
    } else {
        synth
    };

    Ok(CompositeOutput {
        image: Arc::new(image),
        matte: Arc::new(matte),
        sky: Arc::new(sky),
        relit: Arc::new(relit),
    })
}

fn timed<T>(
    reporter: &dyn ProgressReporter,
    stage: PipelineStage,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    reporter.begin_stage(stage);
    let start = Instant::now();
    let out = f()?;
    debug!(
        stage = %stage,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Stage complete"
    );
    reporter.finish_stage(stage, false);
    Ok(out)
}

/// Frame compositor that memoizes every stage.
///
/// Keys chain the fingerprints of upstream stages, so changing one parameter
/// only recomputes the stages that depend on it: toggling the halo re-runs the
/// halo alone, and a fixed skybox is tiled once for a whole frame sequence.
#[derive(Debug, Default)]
pub struct CompositePipeline {
    params: GuidedFilterParams,
    cache: StageCache,
}

impl CompositePipeline {
    pub fn new(params: GuidedFilterParams) -> Self {
        Self::with_cache(params, StageCache::default())
    }

    pub fn with_cache(params: GuidedFilterParams, cache: StageCache) -> Self {
        Self { params, cache }
    }

    pub fn params(&self) -> &GuidedFilterParams {
        &self.params
    }

    pub fn cache(&self) -> &StageCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut StageCache {
        &mut self.cache
    }

    /// Composite one frame, reusing cached stage results where inputs match.
    pub fn run_frame(
        &mut self,
        inputs: FrameInputs<'_>,
        config: &CompositeConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<CompositeOutput> {
        config.validate()?;
        let canvas = inputs.canvas()?;
        let params = self.params;
        let cache = &mut self.cache;

        let source_key = FingerprintBuilder::new(PipelineStage::Loading)
            .array(&inputs.source.data)
            .finish();

        let refine_key = FingerprintBuilder::new(PipelineStage::Refining)
            .upstream(source_key)
            .array(inputs.coarse_mask)
            .usize(params.radius)
            .f32(params.eps)
            .finish();
        let matte = cached(cache, reporter, PipelineStage::Refining, refine_key, || {
            refine_matte(inputs.source, inputs.coarse_mask, &params)
        })?;

        let tile_key = FingerprintBuilder::new(PipelineStage::Tiling)
            .array(&inputs.sky.data)
            .usize(canvas.width)
            .usize(canvas.height)
            .f32(config.skybox_center_crop)
            .finish();
        let sky = cached(cache, reporter, PipelineStage::Tiling, tile_key, || {
            tile_skybox(inputs.sky, canvas, config.skybox_center_crop)
        })?;

        let relight_key = FingerprintBuilder::new(PipelineStage::Relighting)
            .upstream(source_key)
            .upstream(refine_key)
            .upstream(tile_key)
            .f32(config.recoloring_factor)
            .f32(config.relighting_factor)
            .bool(config.auto_light_matching)
            .finish();
        let relit = cached(cache, reporter, PipelineStage::Relighting, relight_key, || {
            relight(inputs.source, &sky, &matte, config)
        })?;

        let blend_key = FingerprintBuilder::new(PipelineStage::Blending)
            .upstream(relight_key)
            .upstream(tile_key)
            .upstream(refine_key)
            .finish();
        let synth = cached(cache, reporter, PipelineStage::Blending, blend_key, || {
            alpha_blend(&relit, &sky, &matte)
        })?;

        let image = if config.halo_effect {
            let halo_key = FingerprintBuilder::new(PipelineStage::Halo)
                .upstream(blend_key)
                .upstream(tile_key)
                .upstream(refine_key)
                .finish();
            cached(cache, reporter, PipelineStage::Halo, halo_key, || {
                apply_halo(&synth, &sky, &matte)
            })?
        } else {
            synth
        };

        debug!(
            hits = cache.hits(),
            misses = cache.misses(),
            "Stage cache"
        );
        Ok(CompositeOutput {
            image,
            matte,
            sky,
            relit,
        })
    }
}

fn cached<T, F>(
    cache: &mut StageCache,
    reporter: &dyn ProgressReporter,
    stage: PipelineStage,
    key: Fingerprint,
    compute: F,
) -> Result<Arc<T>>
where
    T: Cacheable,
    F: FnOnce() -> Result<T>,
{
    reporter.begin_stage(stage);
    let start = Instant::now();
    let (value, hit) = cache.get_or_compute(stage, key, compute)?;
    debug!(
        stage = %stage,
        cached = hit,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Stage complete"
    );
    reporter.finish_stage(stage, hit);
    Ok(value)
}
