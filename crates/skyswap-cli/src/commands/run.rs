use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyswap_core::io::{prepare_inputs, save_matte, save_rgb};
use skyswap_core::pipeline::config::PipelineConfig;
use skyswap_core::pipeline::{run_composite_reported, PipelineStage};

use super::options::CompositeOptions;
use crate::progress::StageSpinner;
use crate::summary::print_pipeline_summary;

#[derive(Args)]
pub struct RunArgs {
    /// Source photograph
    #[arg(required_unless_present = "config")]
    pub source: Option<PathBuf>,

    /// Replacement sky image
    #[arg(long, required_unless_present = "config")]
    pub sky: Option<PathBuf>,

    /// Coarse sky probability mask (grayscale)
    #[arg(long, required_unless_present = "config")]
    pub mask: Option<PathBuf>,

    /// Pipeline config file (TOML); replaces all other options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also save the refined matte to this path
    #[arg(long)]
    pub save_matte: Option<PathBuf>,

    #[command(flatten)]
    pub options: CompositeOptions,

    /// Output file path
    #[arg(short, long, default_value = "composite.png")]
    pub output: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        build_config_from_args(args)?
    };
    config.validate().context("Invalid pipeline config")?;

    print_pipeline_summary(&config);

    let spinner = StageSpinner::new()?;
    spinner.set_stage(PipelineStage::Loading);
    let inputs = prepare_inputs(&config).context("Failed to load inputs")?;

    let output = run_composite_reported(
        inputs.frame_inputs(),
        &config.guided_filter,
        &config.composite,
        &spinner,
    )?;

    spinner.set_stage(PipelineStage::Writing);
    save_rgb(&output.image, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    if let Some(ref matte_path) = args.save_matte {
        save_matte(&output.matte, matte_path)
            .with_context(|| format!("Failed to write {}", matte_path.display()))?;
    }
    spinner.finish("Done");

    println!("\nOutput saved to {}", config.output.display());
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> Result<PipelineConfig> {
    let source = args.source.clone().context("Missing source image")?;
    let sky = args.sky.clone().context("Missing --sky")?;
    let mask = args.mask.clone().context("Missing --mask")?;

    Ok(PipelineConfig {
        source,
        sky,
        mask,
        output: args.output.clone(),
        canvas: args.options.matte.canvas(),
        guided_filter: args.options.matte.guided_filter(),
        composite: args.options.composite(),
    })
}
