use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyswap_core::filters::guided::refine_matte;
use skyswap_core::io::prepare::{prepare_mask, prepare_source};
use skyswap_core::io::save_matte;

use super::options::MatteOptions;

#[derive(Args)]
pub struct MatteArgs {
    /// Source photograph (guides the refinement)
    pub source: PathBuf,

    /// Coarse sky probability mask (grayscale)
    #[arg(long)]
    pub mask: PathBuf,

    #[command(flatten)]
    pub options: MatteOptions,

    /// Output file path (PNG, or 16-bit TIFF by extension)
    #[arg(short, long, default_value = "matte.png")]
    pub output: PathBuf,
}

pub fn run(args: &MatteArgs) -> Result<()> {
    let canvas = args.options.canvas();
    let source = prepare_source(&args.source, canvas)
        .with_context(|| format!("Failed to load {}", args.source.display()))?;
    let coarse = prepare_mask(&args.mask, canvas)
        .with_context(|| format!("Failed to load {}", args.mask.display()))?;

    println!(
        "Refining {}x{} matte (radius={}, eps={})",
        canvas.width, canvas.height, args.options.radius, args.options.eps
    );
    let matte = refine_matte(&source, &coarse, &args.options.guided_filter())?;

    save_matte(&matte, &args.output)?;
    println!("Saved to {}", args.output.display());
    Ok(())
}
