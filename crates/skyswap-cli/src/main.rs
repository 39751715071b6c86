mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyswap", about = "Sky replacement compositing tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the sky in one image
    Run(commands::run::RunArgs),
    /// Replace the sky in every frame of a directory
    Batch(commands::batch::BatchArgs),
    /// Refine a coarse sky mask and save the matte
    Matte(commands::matte::MatteArgs),
    /// Print or save a default pipeline config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Matte(args) => commands::matte::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
