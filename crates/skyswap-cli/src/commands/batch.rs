use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use skyswap_core::io::prepare::{prepare_mask, prepare_sky, prepare_source};
use skyswap_core::io::save_rgb;
use skyswap_core::pipeline::{CompositePipeline, FrameInputs};
use tracing::warn;

use super::options::CompositeOptions;
use crate::progress::FrameProgress;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

#[derive(Args)]
pub struct BatchArgs {
    /// Directory of source frames
    pub frames: PathBuf,

    /// Replacement sky image, shared by every frame
    #[arg(long)]
    pub sky: PathBuf,

    /// Directory of coarse sky masks, matched to frames by file stem
    #[arg(long)]
    pub masks: PathBuf,

    /// Output image extension (png, tif or tiff)
    #[arg(long, default_value = "png", value_parser = ["png", "tif", "tiff"])]
    pub format: String,

    #[command(flatten)]
    pub options: CompositeOptions,

    /// Output directory
    #[arg(short, long, default_value = "composited")]
    pub output: PathBuf,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files in `dir`, sorted by name so frame order is stable.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn find_mask(masks: &[PathBuf], stem: &str) -> Option<PathBuf> {
    masks
        .iter()
        .find(|p| p.file_stem().and_then(|s| s.to_str()) == Some(stem))
        .cloned()
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let composite = args.options.composite();
    composite.validate().context("Invalid compositing options")?;
    let canvas = args.options.matte.canvas();

    let frames = list_images(&args.frames)?;
    if frames.is_empty() {
        anyhow::bail!("No images found in {}", args.frames.display());
    }
    let masks = list_images(&args.masks)?;

    let sky = prepare_sky(&args.sky, canvas)
        .with_context(|| format!("Failed to load {}", args.sky.display()))?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut pipeline = CompositePipeline::new(args.options.matte.guided_filter());
    let params = pipeline.params();
    println!(
        "Compositing {} frames at {}x{} (radius={}, eps={})",
        frames.len(),
        canvas.width,
        canvas.height,
        params.radius,
        params.eps
    );
    let progress = FrameProgress::new(frames.len())?;
    let mut written = 0usize;

    for frame_path in &frames {
        let Some(stem) = frame_path.file_stem().and_then(|s| s.to_str()) else {
            progress.inc();
            continue;
        };
        let Some(mask_path) = find_mask(&masks, stem) else {
            warn!(frame = %frame_path.display(), "No matching mask, skipping");
            progress.inc();
            continue;
        };

        let source = prepare_source(frame_path, canvas)
            .with_context(|| format!("Failed to load {}", frame_path.display()))?;
        let coarse_mask = prepare_mask(&mask_path, canvas)
            .with_context(|| format!("Failed to load {}", mask_path.display()))?;

        let output = pipeline.run_frame(
            FrameInputs {
                source: &source,
                sky: &sky,
                coarse_mask: &coarse_mask,
            },
            &composite,
            &progress,
        )?;

        let out_path = args.output.join(format!("{stem}.{}", args.format));
        save_rgb(&output.image, &out_path)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        written += 1;
        progress.inc();
    }
    progress.finish();

    let cache = pipeline.cache();
    println!(
        "\nComposited {written}/{} frames into {} (stage cache: {} hits, {} misses)",
        frames.len(),
        args.output.display(),
        cache.hits(),
        cache.misses()
    );
    Ok(())
}
